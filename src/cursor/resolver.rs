use super::scanner::{Frame, FrameKind, JsonScanner, ScanEvent};

/// Structural coordinate the editor cursor sits inside, derived on demand
/// from raw schema text. Never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorInfo {
    pub kind: CursorKind,
    pub page_index: Option<usize>,
    pub section_index: Option<usize>,
    pub question_index: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorKind {
    Form,
    Page,
    Section,
    Question,
}

/// Maps a (row, column) text position to the page/section/question the
/// cursor is logically inside.
///
/// Scans character-by-character from the start of `text` up to and including
/// the cursor offset, then walks the container stack innermost-out for the
/// nearest arrays keyed `questions`, `sections`, and `pages`. Works on
/// transiently invalid JSON; returns `None` only for empty text or an
/// out-of-range row.
pub fn resolve_cursor(text: &str, row: usize, column: usize) -> Option<CursorInfo> {
    if text.is_empty() {
        return None;
    }
    let offset = offset_of(text, row, column)?;

    let mut scanner = JsonScanner::new();
    for (i, ch) in text.char_indices() {
        if i > offset {
            break;
        }
        scanner.advance(ch);
    }

    info_from_stack(scanner.stack())
}

/// Finds the 1-based line at which the object addressed by the given
/// coordinate starts, preferring the line of its `label` key (`name` for the
/// form-level target, all indices `None`). Returns the object's opening line
/// if it closes before a label is seen, and `0` if the coordinate does not
/// exist in the text.
pub fn locate_line(
    text: &str,
    page_index: Option<usize>,
    section_index: Option<usize>,
    question_index: Option<usize>,
) -> usize {
    let mut targets: Vec<(&str, usize)> = Vec::new();
    if let Some(page) = page_index {
        targets.push(("pages", page));
        if let Some(section) = section_index {
            targets.push(("sections", section));
            if let Some(question) = question_index {
                targets.push(("questions", question));
            }
        }
    }
    let label_key = if targets.is_empty() { "name" } else { "label" };

    let mut scanner = JsonScanner::new();
    let mut target_depth: Option<usize> = None;
    let mut opened_line = 0;

    for ch in text.chars() {
        match scanner.advance(ch) {
            Some(ScanEvent::ObjectOpen) => {
                if target_depth.is_none() && stack_matches(scanner.stack(), &targets) {
                    target_depth = Some(scanner.stack().len());
                    opened_line = scanner.line();
                }
            }
            Some(ScanEvent::ObjectClose) => {
                if let Some(depth) = target_depth {
                    if scanner.stack().len() < depth {
                        // Target closed without a label; fall back to where
                        // it opened.
                        return opened_line;
                    }
                }
            }
            Some(ScanEvent::Key { name, line }) => {
                if let Some(depth) = target_depth {
                    if scanner.stack().len() == depth && name == label_key {
                        return line;
                    }
                }
            }
            _ => {}
        }
    }

    opened_line
}

/// Byte offset of the character at (row, column); columns are counted in
/// characters and clamped to the end of the row.
fn offset_of(text: &str, row: usize, column: usize) -> Option<usize> {
    let mut start = 0usize;
    for (i, line) in text.split('\n').enumerate() {
        if i == row {
            let col_bytes = line
                .char_indices()
                .nth(column)
                .map(|(byte, _)| byte)
                .unwrap_or(line.len());
            return Some(start + col_bytes);
        }
        start += line.len() + 1;
    }
    None
}

fn info_from_stack(stack: &[Frame]) -> Option<CursorInfo> {
    let root = stack.first()?;

    let mut page_index = None;
    let mut section_index = None;
    let mut question_index = None;

    // Innermost-out: the nearest questions array wins (an obsGroup cursor
    // reports the sub-question, not the group), then sections, then pages.
    for frame in stack.iter().rev() {
        if frame.kind != FrameKind::Array {
            continue;
        }
        match frame.key.as_deref() {
            Some("questions") if question_index.is_none() && section_index.is_none() => {
                question_index = Some(frame.index);
            }
            Some("sections") if section_index.is_none() => {
                section_index = Some(frame.index);
            }
            Some("pages") if page_index.is_none() => {
                page_index = Some(frame.index);
            }
            _ => {}
        }
    }

    let kind = if question_index.is_some() {
        CursorKind::Question
    } else if section_index.is_some() {
        CursorKind::Section
    } else if page_index.is_some() {
        CursorKind::Page
    } else if root.kind == FrameKind::Object {
        CursorKind::Form
    } else {
        return None;
    };

    Some(CursorInfo {
        kind,
        page_index,
        section_index,
        question_index,
    })
}

/// True when the frame just pushed is the object addressed by `targets`:
/// its array ancestors, outermost first, carry exactly the expected keys and
/// indices, and its immediate parent is the innermost of those arrays.
fn stack_matches(stack: &[Frame], targets: &[(&str, usize)]) -> bool {
    let Some((object, ancestors)) = stack.split_last() else {
        return false;
    };
    if object.kind != FrameKind::Object {
        return false;
    }

    if targets.is_empty() {
        // Form-level target: the root object itself.
        return ancestors.is_empty();
    }
    if ancestors.last().map(|f| f.kind) != Some(FrameKind::Array) {
        return false;
    }

    let arrays: Vec<&Frame> = ancestors
        .iter()
        .filter(|f| f.kind == FrameKind::Array)
        .collect();
    if arrays.len() != targets.len() {
        return false;
    }
    arrays
        .iter()
        .zip(targets)
        .all(|(frame, (key, index))| frame.key.as_deref() == Some(*key) && frame.index == *index)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLAT: &str = r#"{"pages":[{"sections":[{"questions":[{"id":"q1"}]}]}]}"#;

    #[test]
    fn test_cursor_inside_question_id() {
        let column = FLAT.find("q1").unwrap();
        let info = resolve_cursor(FLAT, 0, column).unwrap();
        assert_eq!(info.kind, CursorKind::Question);
        assert_eq!(info.page_index, Some(0));
        assert_eq!(info.section_index, Some(0));
        assert_eq!(info.question_index, Some(0));
    }

    #[test]
    fn test_cursor_at_form_level() {
        let text = r#"{"name":"Test","pages":[]}"#;
        let info = resolve_cursor(text, 0, 3).unwrap();
        assert_eq!(info.kind, CursorKind::Form);
        assert_eq!(info.page_index, None);
    }

    #[test]
    fn test_empty_text_is_none() {
        assert_eq!(resolve_cursor("", 0, 0), None);
    }

    #[test]
    fn test_row_out_of_range_is_none() {
        assert_eq!(resolve_cursor("{}", 5, 0), None);
    }

    #[test]
    fn test_second_array_element() {
        let text = r#"{"pages":[{"label":"a"},{"label":"b"}]}"#;
        let column = text.rfind('b').unwrap();
        let info = resolve_cursor(text, 0, column).unwrap();
        assert_eq!(info.kind, CursorKind::Page);
        assert_eq!(info.page_index, Some(1));
    }

    #[test]
    fn test_locate_line_falls_back_to_opening_brace() {
        // Question object with no label key at its own depth.
        let text = "{\n\"pages\":[{\n\"sections\":[{\n\"questions\":[{\n\"id\":\"q1\"\n}]\n}]\n}]\n}";
        // Object opens on line 4; its only key is "id".
        assert_eq!(
            locate_line(text, Some(0), Some(0), Some(0)),
            4,
            "should fall back to the opening line when no label exists"
        );
    }

    #[test]
    fn test_locate_line_missing_target_is_zero() {
        let text = r#"{"pages":[]}"#;
        assert_eq!(locate_line(text, Some(2), None, None), 0);
    }
}
