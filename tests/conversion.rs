//! End-to-end conversion tests: Markdown in, `.docx` archive out, read back
//! with `zip` and `quick-xml`.

use md2docx::common::xml::unescape_xml;
use md2docx::convert::{ConvertOptions, Converter};
use md2docx::markdown::{self, Block, Inline};
use md2docx::ooxml::opc::verify_package;
use md2docx::{SerializationError, markdown_to_docx};
use proptest::prelude::*;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::io::{Cursor, Read};

/// 1x1 transparent PNG.
const PNG_1X1_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

#[derive(Debug, Default)]
struct RunInfo {
    text: String,
    bold: bool,
    italic: bool,
}

#[derive(Debug, Default)]
struct ParaInfo {
    style: Option<String>,
    num_id: Option<String>,
    ilvl: Option<String>,
    runs: Vec<RunInfo>,
}

impl ParaInfo {
    fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

fn convert(input: &str) -> Vec<u8> {
    markdown_to_docx(input).expect("conversion succeeds")
}

fn part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    let mut file = archive.by_name(name).expect("part present");
    let mut out = String::new();
    file.read_to_string(&mut out).expect("utf-8 part");
    out
}

fn member_names(bytes: &[u8]) -> Vec<String> {
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    archive.file_names().map(str::to_string).collect()
}

fn val(e: &BytesStart<'_>) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == b"val")
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

/// Paragraphs of document.xml in order, including those inside table cells.
fn paragraphs(bytes: &[u8]) -> Vec<ParaInfo> {
    let xml = part(bytes, "word/document.xml");
    let mut reader = Reader::from_str(&xml);
    let mut paras = Vec::new();
    let mut para: Option<ParaInfo> = None;
    let mut run: Option<RunInfo> = None;
    let mut raw = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event().expect("well-formed xml") {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"p" => para = Some(ParaInfo::default()),
                b"pStyle" => {
                    if let Some(p) = para.as_mut() {
                        p.style = val(&e);
                    }
                },
                b"numId" => {
                    if let Some(p) = para.as_mut() {
                        p.num_id = val(&e);
                    }
                },
                b"ilvl" => {
                    if let Some(p) = para.as_mut() {
                        p.ilvl = val(&e);
                    }
                },
                b"r" => {
                    run = Some(RunInfo::default());
                    raw.clear();
                },
                b"b" => {
                    if let Some(r) = run.as_mut() {
                        r.bold = true;
                    }
                },
                b"i" => {
                    if let Some(r) = run.as_mut() {
                        r.italic = true;
                    }
                },
                b"br" => raw.push('\n'),
                b"t" => in_text = true,
                _ => {},
            },
            Event::Text(e) if in_text => raw.push_str(&String::from_utf8_lossy(&e)),
            Event::GeneralRef(e) if in_text => {
                raw.push('&');
                raw.push_str(&String::from_utf8_lossy(&e));
                raw.push(';');
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"r" => {
                    if let (Some(mut r), Some(p)) = (run.take(), para.as_mut()) {
                        r.text = unescape_xml(&raw);
                        p.runs.push(r);
                    }
                },
                b"p" => paras.extend(para.take()),
                _ => {},
            },
            Event::Eof => break,
            _ => {},
        }
    }
    paras
}

#[test]
fn round_trip_scenario() {
    let input = "# Title\n\nSome **bold** text.\n\n- item1\n- item2";

    let doc = markdown::parse(input);
    assert_eq!(doc.len(), 3);
    assert!(matches!(doc.blocks[0], Block::Heading { level: 1, .. }));
    match &doc.blocks[1] {
        Block::Paragraph { content } => {
            assert!(matches!(
                content.as_slice(),
                [Inline::Text(_), Inline::Bold(_), Inline::Text(_)]
            ));
        },
        other => panic!("expected paragraph, got {other:?}"),
    }
    match &doc.blocks[2] {
        Block::List(list) => {
            assert!(!list.ordered);
            assert_eq!(list.items.len(), 2);
        },
        other => panic!("expected list, got {other:?}"),
    }

    let paras = paragraphs(&convert(input));
    assert_eq!(paras.len(), 4);

    assert_eq!(paras[0].style.as_deref(), Some("Heading1"));
    assert_eq!(paras[0].text(), "Title");

    let runs = &paras[1].runs;
    assert_eq!(runs.len(), 3);
    assert_eq!(runs[0].text, "Some ");
    assert!(!runs[0].bold);
    assert_eq!(runs[1].text, "bold");
    assert!(runs[1].bold);
    assert_eq!(runs[2].text, " text.");

    for (para, expected) in paras[2..].iter().zip(["item1", "item2"]) {
        assert_eq!(para.text(), expected);
        assert_eq!(para.num_id.as_deref(), Some("1"));
        assert_eq!(para.ilvl.as_deref(), Some("0"));
    }
}

#[test]
fn table_scenario() {
    let input = "| Name | Qty |\n|------|----:|\n| apple | 3 |\n| pear | 5 |";

    let doc = markdown::parse(input);
    assert_eq!(doc.len(), 1);
    match &doc.blocks[0] {
        Block::Table(table) => {
            assert_eq!(table.header.len(), 2);
            assert_eq!(table.column_count(), 2);
            assert_eq!(table.rows.len(), 2);
            assert_eq!(markdown::plain_text(&table.rows[1][0].content), "pear");
        },
        other => panic!("expected table, got {other:?}"),
    }

    let bytes = convert(input);
    let xml = part(&bytes, "word/document.xml");
    assert_eq!(xml.matches("<w:tbl>").count(), 1);
    assert_eq!(xml.matches("<w:tr>").count(), 3);
    assert_eq!(xml.matches("<w:tc>").count(), 6);
    assert_eq!(xml.matches("<w:tblHeader/>").count(), 1);
    assert!(!xml.contains("----"));

    let cells: Vec<String> = paragraphs(&bytes).iter().map(ParaInfo::text).collect();
    assert_eq!(cells, ["Name", "Qty", "apple", "3", "pear", "5"]);
}

#[test]
fn unmatched_bold_stays_literal() {
    let paras = paragraphs(&convert("**bold"));
    assert_eq!(paras.len(), 1);
    assert_eq!(paras[0].text(), "**bold");
    assert!(paras[0].runs.iter().all(|r| !r.bold));
}

#[test]
fn formatted_link_label_is_flattened() {
    let bytes = convert("[**bold** link](https://x.io)");
    let paras = paragraphs(&bytes);
    assert_eq!(paras.len(), 1);
    assert_eq!(paras[0].text(), "bold link");
    assert!(part(&bytes, "word/_rels/document.xml.rels").contains(r#"Target="https://x.io""#));
}

#[test]
fn deeply_nested_input_converts_on_small_stack() {
    let inputs = [
        format!("{} x", ">".repeat(5000)),
        format!("{}x{}", "**".repeat(20000), "**".repeat(20000)),
        format!("{}x{}", "[".repeat(5000), "](u)".repeat(5000)),
    ];
    for input in inputs {
        let bytes = std::thread::Builder::new()
            .stack_size(2 << 20)
            .spawn(move || markdown_to_docx(&input))
            .expect("thread spawns")
            .join()
            .expect("no stack overflow")
            .expect("conversion succeeds");
        assert!(verify_package(&bytes).expect("readable package").is_valid());
        assert!(paragraphs(&bytes).iter().any(|p| p.text().contains('x')));
    }
}

#[test]
fn unterminated_fence_captures_rest() {
    let paras = paragraphs(&convert("before\n\n```\nline one\n  **x** <y>\n# not heading"));
    assert_eq!(paras.len(), 2);
    assert_eq!(paras[1].style.as_deref(), Some("CodeBlock"));
    assert_eq!(paras[1].text(), "line one\n  **x** <y>\n# not heading");
    assert!(paras[1].runs.iter().all(|r| !r.bold));
}

#[test]
fn concurrent_conversions_are_byte_identical() {
    let input = "# Report\n\n1. first\n2. second\n\n| a | b |\n|---|---|\n| [x](https://x.example) | `y` |\n\n> quoted *text*";
    let expected = convert(input);

    let outputs: Vec<Vec<u8>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4).map(|_| scope.spawn(|| convert(input))).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for output in outputs {
        assert_eq!(output, expected);
    }
}

#[test]
fn package_manifests_match_parts() {
    let input = format!(
        "# Everything\n\nA [link](https://example.com?a=1&b=2) and ![dot](data:image/png;base64,{PNG_1X1_BASE64}).\n\n- a\n  1. b\n\n```rust\nlet x = 1;\n```\n\n---\n\n> quote\n\n| h |\n|---|\n| ![remote](https://example.com/r.png) |"
    );
    let bytes = convert(&input);

    let report = verify_package(&bytes).unwrap();
    assert!(report.is_valid(), "{:?}", report.violations);

    let mut names = member_names(&bytes);
    names.sort();
    assert_eq!(
        names,
        [
            "[Content_Types].xml",
            "_rels/.rels",
            "docProps/app.xml",
            "docProps/core.xml",
            "word/_rels/document.xml.rels",
            "word/document.xml",
            "word/media/image1.png",
            "word/numbering.xml",
            "word/styles.xml",
        ]
    );
}

#[test]
fn data_uri_image_is_embedded() {
    let bytes = convert(&format!("![dot](data:image/png;base64,{PNG_1X1_BASE64})"));

    let document = part(&bytes, "word/document.xml");
    assert!(document.contains(r#"<a:blip r:embed="rId3"/>"#));
    assert!(document.contains(r#"descr="dot""#));

    let rels = part(&bytes, "word/_rels/document.xml.rels");
    assert!(rels.contains(r#"Target="media/image1.png""#));

    let content_types = part(&bytes, "[Content_Types].xml");
    assert!(content_types.contains(r#"Extension="png""#));
}

#[test]
fn unresolved_image_is_linked_placeholder() {
    let bytes = convert("![logo](https://example.com/logo.png)");

    let document = part(&bytes, "word/document.xml");
    assert!(document.contains(r#"<a:blip r:link="rId3"/>"#));

    let rels = part(&bytes, "word/_rels/document.xml.rels");
    assert!(rels.contains(r#"Target="https://example.com/logo.png""#));
    assert!(rels.contains(r#"TargetMode="External""#));
    assert!(!member_names(&bytes).iter().any(|n| n.starts_with("word/media/")));
}

#[test]
fn local_image_resolves_through_filesystem() {
    use base64::Engine;

    let dir = tempfile::tempdir().unwrap();
    let png = base64::engine::general_purpose::STANDARD
        .decode(PNG_1X1_BASE64)
        .unwrap();
    std::fs::write(dir.path().join("dot.png"), png).unwrap();

    let converter = Converter::new(ConvertOptions::default())
        .with_resolver(md2docx::convert::FsResolver::new(dir.path()));
    let bytes = converter.convert("![dot](dot.png)").unwrap();
    assert!(member_names(&bytes).contains(&"word/media/image1.png".to_string()));
}

#[test]
fn hyperlink_relationship_is_escaped_and_shared() {
    let bytes = convert("[q](https://example.com/?a=1&b=2) and [r](https://example.com/?a=1&b=2)");
    let rels = part(&bytes, "word/_rels/document.xml.rels");
    assert_eq!(rels.matches(r#"Target="https://example.com/?a=1&amp;b=2""#).count(), 1);
}

#[test]
fn serialization_error_is_distinct_type() {
    let result: Result<Vec<u8>, SerializationError> = markdown_to_docx("plain");
    assert!(result.is_ok());
    let err = SerializationError::new("disk full");
    assert_eq!(err.cause(), "disk full");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_escaped_text_reads_back(s in "[a-zA-Z0-9<>&\"' ]{0,40}") {
        let input = format!("x{s}y");
        let paras = paragraphs(&convert(&input));
        prop_assert_eq!(paras.len(), 1);
        prop_assert_eq!(paras[0].text(), input);
    }

    #[test]
    fn prop_heading_level_maps_to_style(
        level in 1usize..=6,
        title in "[a-zA-Z]([a-zA-Z0-9 ]{0,20}[a-zA-Z0-9])?",
    ) {
        let input = format!("{} {}", "#".repeat(level), title);
        let paras = paragraphs(&convert(&input));
        prop_assert_eq!(paras.len(), 1);
        let expected = format!("Heading{level}");
        prop_assert_eq!(paras[0].style.as_deref(), Some(expected.as_str()));
        prop_assert_eq!(paras[0].text(), title);
    }

    #[test]
    fn prop_bold_run(word in "[a-zA-Z0-9]{1,20}") {
        let paras = paragraphs(&convert(&format!("**{word}**")));
        prop_assert_eq!(paras[0].runs.len(), 1);
        prop_assert!(paras[0].runs[0].bold);
        prop_assert_eq!(&paras[0].runs[0].text, &word);
    }
}
