use super::LineMode;

#[test]
fn records_end_lines_unless_told_otherwise() {
    assert_eq!(LineMode::default(), LineMode::WithNewline);
    assert_eq!(LineMode::for_skip_newline(false), LineMode::WithNewline);
    assert_eq!(LineMode::for_skip_newline(true), LineMode::WithoutNewline);
}

#[test]
fn progress_lines_have_no_terminator() {
    assert_eq!(LineMode::WithNewline.terminator(), "\n");
    assert_eq!(LineMode::WithoutNewline.terminator(), "");
}
