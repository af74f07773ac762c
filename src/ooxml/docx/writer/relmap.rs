/// Relationship ID mapper for tracking relationships during document generation.
///
/// Relationships are created before the body XML is written. The mapper
/// records one ID per hyperlink and per image in document order, and the
/// serializer consumes them in the same order through a [`RelCursor`].
use crate::ooxml::error::{OoxmlError, Result};

/// Maps document elements to their relationship IDs.
#[derive(Debug, Default)]
pub(crate) struct RelationshipMapper {
    /// Hyperlink relationship IDs in document order
    hyperlink_ids: Vec<String>,
    /// Image relationship IDs in document order
    image_ids: Vec<String>,
}

impl RelationshipMapper {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_hyperlink(&mut self, rel_id: String) {
        self.hyperlink_ids.push(rel_id);
    }

    pub(crate) fn add_image(&mut self, rel_id: String) {
        self.image_ids.push(rel_id);
    }

    /// Start consuming IDs from the first element.
    pub(crate) fn cursor(&self) -> RelCursor<'_> {
        RelCursor {
            mapper: self,
            hyperlinks: 0,
            images: 0,
        }
    }
}

/// Sequential reader over a [`RelationshipMapper`].
pub(crate) struct RelCursor<'a> {
    mapper: &'a RelationshipMapper,
    hyperlinks: usize,
    images: usize,
}

impl<'a> RelCursor<'a> {
    /// ID for the next hyperlink in document order.
    pub(crate) fn next_hyperlink(&mut self) -> Result<&'a str> {
        let id = self.mapper.hyperlink_ids.get(self.hyperlinks).ok_or_else(|| {
            OoxmlError::Other(format!("no relationship for hyperlink {}", self.hyperlinks))
        })?;
        self.hyperlinks += 1;
        Ok(id)
    }

    /// ID for the next image, plus its 1-based drawing number.
    pub(crate) fn next_image(&mut self) -> Result<(&'a str, usize)> {
        let id = self.mapper.image_ids.get(self.images).ok_or_else(|| {
            OoxmlError::Other(format!("no relationship for image {}", self.images))
        })?;
        self.images += 1;
        Ok((id, self.images))
    }
}
