use examdoc::markup::{convert_line, heading_text};
use examdoc::{CharacterFormat, Color, Document, Palette, Run, TextStyle, Theme, convert, convert_with};

fn runs(doc: &Document, block: usize) -> Vec<Run> {
    doc.blocks().nth(block).expect("missing block").inlines.clone()
}

fn texts(doc: &Document, block: usize) -> Vec<String> {
    runs(doc, block).into_iter().map(|r| r.text).collect()
}

fn strip_markup(line: &str) -> String {
    line.replace("**", "").replace(['_', '~', '^'], "")
}

#[test]
fn heading_single_hash() {
    let doc = convert("# Title");
    assert_eq!(doc.sections.len(), 1);
    assert_eq!(doc.block_count(), 1);
    let runs = runs(&doc, 0);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].text, "Title\n");
    let format = runs[0].character_format;
    assert_eq!(format.font_size, 16);
    assert_eq!(format.bold, Some(true));
    assert_eq!(format.italic, None);
    assert_eq!(format.underline, None);
    assert_eq!(format.font_color, Color::HEADING);
}

#[test]
fn double_hash_heading_strips_only_two_characters() {
    // Known quirk: "## " is detected but only two characters are removed.
    let doc = convert("## Section");
    assert_eq!(texts(&doc, 0), vec![" Section\n"]);
    assert_eq!(heading_text("## Section"), Some(" Section"));
}

#[test]
fn heading_ignores_inline_markup() {
    let doc = convert("# **Part** _one_ ^red^");
    assert_eq!(texts(&doc, 0), vec!["**Part** _one_ ^red^\n"]);
}

#[test]
fn not_a_heading_without_space() {
    assert_eq!(heading_text("#Title"), None);
    assert_eq!(heading_text("### Deep"), None);
    assert_eq!(heading_text(" # Indented"), None);
    let doc = convert("#Title");
    assert_eq!(runs(&doc, 0), vec![Run::new("#Title", CharacterFormat::default())]);
}

#[test]
fn plain_text_has_baseline_format() {
    let doc = convert("plain text");
    assert_eq!(runs(&doc, 0), vec![Run::new("plain text", CharacterFormat::default())]);
    let format = CharacterFormat::default();
    assert_eq!(format.font_size, 12);
    assert_eq!(format.font_color, Color::BLACK);
    assert!(!format.is_bold() && !format.is_italic() && !format.is_underline());
}

#[test]
fn bold_toggle() {
    let doc = convert("**bold** normal");
    let runs = runs(&doc, 0);
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].text, "bold");
    assert!(runs[0].character_format.is_bold());
    assert_eq!(runs[1].text, " normal");
    assert!(!runs[1].character_format.is_bold());
    assert_eq!(doc.plain_text(), "bold normal");
}

#[test]
fn lone_asterisk_is_literal() {
    let doc = convert("2 * 3 = 6*");
    assert_eq!(runs(&doc, 0), vec![Run::new("2 * 3 = 6*", CharacterFormat::default())]);
}

#[test]
fn triple_asterisk_toggles_once_and_keeps_one() {
    let doc = convert("***x");
    let runs = runs(&doc, 0);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].text, "*x");
    assert!(runs[0].character_format.is_bold());
}

#[test]
fn italic_and_underline_toggles() {
    let doc = convert("a_b_c~d~e");
    let runs = runs(&doc, 0);
    let got: Vec<(&str, bool, bool)> = runs
        .iter()
        .map(|r| {
            (
                r.text.as_str(),
                r.character_format.is_italic(),
                r.character_format.is_underline(),
            )
        })
        .collect();
    assert_eq!(
        got,
        vec![
            ("a", false, false),
            ("b", true, false),
            ("c", false, false),
            ("d", false, true),
            ("e", false, false),
        ]
    );
}

#[test]
fn unmatched_italic_stays_on() {
    let doc = convert("_italic then more **bold**");
    let runs = runs(&doc, 0);
    assert_eq!(texts(&doc, 0), vec!["italic then more ", "bold"]);
    assert!(runs.iter().all(|r| r.character_format.is_italic()));
}

#[test]
fn toggles_reset_on_each_line() {
    let doc = convert("_open\nnext");
    assert!(runs(&doc, 0)[0].character_format.is_italic());
    assert_eq!(runs(&doc, 1), vec![Run::new("next", CharacterFormat::default())]);
}

#[test]
fn color_cycle() {
    let doc = convert("a^b^c^d^e^f");
    let colors: Vec<Color> = runs(&doc, 0)
        .iter()
        .map(|r| r.character_format.font_color)
        .collect();
    assert_eq!(
        colors,
        vec![
            Color::BLACK,
            Color::RED,
            Color::GREEN,
            Color::BLUE,
            Color::ORANGE,
            Color::RED,
        ]
    );
}

#[test]
fn fourth_color_toggle_reaches_last_palette_entry() {
    let doc = convert("a^b^c^d^e");
    let last = runs(&doc, 0).pop().expect("no runs");
    assert_eq!(last.text, "e");
    assert_eq!(last.character_format.font_color, Palette::default().colors()[3]);
}

#[test]
fn earlier_runs_keep_their_format() {
    let doc = convert("x**y**z");
    let runs = runs(&doc, 0);
    assert!(!runs[0].character_format.is_bold());
    assert!(runs[1].character_format.is_bold());
    assert!(!runs[2].character_format.is_bold());
}

#[test]
fn adjacent_delimiters_emit_no_empty_runs() {
    let doc = convert("__~~^");
    assert!(runs(&doc, 0).is_empty());
    let doc = convert("**_x_**");
    assert_eq!(texts(&doc, 0), vec!["x"]);
    assert!(runs(&doc, 0)[0].character_format.is_bold());
    assert!(runs(&doc, 0)[0].character_format.is_italic());
}

#[test]
fn double_toggle_splits_runs_with_equal_format() {
    let doc = convert("a__b");
    let runs = runs(&doc, 0);
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].character_format, runs[1].character_format);
}

#[test]
fn block_count_matches_line_count() {
    for input in ["one", "one\ntwo", "a\n\nb\n", "\n", "\n\n\n", "# h\n**b**\n_i_"] {
        let doc = convert(input);
        assert_eq!(doc.block_count(), input.split('\n').count(), "input {:?}", input);
    }
}

#[test]
fn empty_input_has_no_blocks() {
    let doc = convert("");
    assert_eq!(doc.sections.len(), 1);
    assert_eq!(doc.block_count(), 0);
    assert!(doc.is_empty());
}

#[test]
fn blank_lines_are_blank_blocks() {
    let doc = convert("a\n\nb");
    let blocks: Vec<bool> = doc.blocks().map(|b| b.is_blank()).collect();
    assert_eq!(blocks, vec![false, true, false]);
}

#[test]
fn carriage_returns_are_kept() {
    let doc = convert("a\r\nb");
    assert_eq!(texts(&doc, 0), vec!["a\r"]);
}

#[test]
fn concatenated_runs_equal_line_without_delimiters() {
    let lines = [
        "**Question 1:** Which ^planet^ is _closest_ to the ~sun~?",
        "a) Mercury   b) Venus * c) Mars",
        "_unbalanced **mix ~of^ everything",
        "accents: é, ü, 日本語 _ok_",
        "",
    ];
    for line in lines {
        let block = convert_line(line, &Theme::default());
        assert_eq!(block.plain_text(), strip_markup(line), "line {:?}", line);
    }
}

#[test]
fn custom_theme() {
    let theme = Theme {
        palette: Palette::new(vec![Color::rgb(1, 2, 3)]).expect("non-empty"),
        body: TextStyle {
            font_size: 11,
            color: Color::rgb(0x33, 0x33, 0x33),
        },
        heading: TextStyle {
            font_size: 20,
            color: Color::BLUE,
        },
    };
    let doc = convert_with("# T\nx^y^z", &theme);
    let heading = &runs(&doc, 0)[0];
    assert_eq!(heading.character_format.font_size, 20);
    assert_eq!(heading.character_format.font_color, Color::BLUE);

    let colors: Vec<Color> = runs(&doc, 1)
        .iter()
        .map(|r| r.character_format.font_color)
        .collect();
    assert_eq!(
        colors,
        vec![Color::rgb(0x33, 0x33, 0x33), Color::rgb(1, 2, 3), Color::rgb(1, 2, 3)]
    );
    assert!(runs(&doc, 1).iter().all(|r| r.character_format.font_size == 11));
}

#[test]
fn concurrent_conversions_are_independent() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            std::thread::spawn(move || {
                let text = format!("# Exam {}\n**Q{}** ^answer^", i, i);
                convert(&text)
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let doc = handle.join().expect("thread panicked");
        assert_eq!(doc.plain_text(), format!("Exam {}\nQ{} answer", i, i));
    }
}
