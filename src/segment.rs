//! Body and comment segmentation.
//!
//! Every source line belongs to exactly one directive: either to its comments
//! (lines before the directive line) or to its body (lines after it). The line
//! immediately preceding a directive is never part of the previous body; it is
//! picked up as that directive's comment instead.

use crate::directive::Directive;

/// Assign `comments` and `body` to each directive in place.
///
/// `directives` must be ordered by strictly increasing `line_index`.
pub fn segment(lines: &[String], directives: &mut [Directive]) {
    let mut prev_body_end: Option<usize> = None;

    for index in 0..directives.len() {
        let line_index = directives[index].line_index;
        let next_line_index = directives.get(index + 1).map(|next| next.line_index);

        let comments_start = match prev_body_end {
            None => 0,
            Some(end) => end + 1,
        };
        let comments = slice(lines, comments_start, line_index);

        let body = match next_line_index {
            None => slice(lines, line_index + 1, lines.len()),
            // The separator line before the next directive is reserved.
            Some(next) => slice(lines, line_index + 1, next.saturating_sub(1)),
        };

        prev_body_end = Some(line_index + body.len());

        let directive = &mut directives[index];
        directive.comments = comments;
        directive.body = body;
    }
}

/// `lines[start..end]` with out-of-range or inverted bounds yielding nothing.
fn slice(lines: &[String], start: usize, end: usize) -> Vec<String> {
    let end = end.min(lines.len());
    if start >= end {
        return Vec::new();
    }
    lines[start..end].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::{recognize, Directive};

    fn scan(source: &str) -> (Vec<String>, Vec<Directive>) {
        let lines: Vec<String> = source.split('\n').map(str::to_string).collect();
        let directives = lines
            .iter()
            .enumerate()
            .filter_map(|(i, line)| recognize(line).map(|node| Directive::new(node, line, i)))
            .collect();
        (lines, directives)
    }

    fn reconstruct(directives: &[Directive]) -> Vec<String> {
        let mut out = Vec::new();
        for d in directives {
            out.extend(d.comments.iter().cloned());
            out.push(d.source_line.clone());
            out.extend(d.body.iter().cloned());
        }
        out
    }

    #[test]
    fn test_partition_reconstructs_source() {
        let source = "// header\n\nclass Point(x, y)\n    this.x = x\n    this.y = y\n\n//---\n// doc\nmethod add(p)\n    return p\n\n//---\nmethod zero\n";
        let (lines, mut directives) = scan(source);
        segment(&lines, &mut directives);

        assert_eq!(reconstruct(&directives), lines);
    }

    #[test]
    fn test_first_comments_start_at_zero_and_last_body_reaches_eof() {
        let source = "// a\n// b\nclass A\n    body\n\nmethod m\n    x\n    y";
        let (lines, mut directives) = scan(source);
        segment(&lines, &mut directives);

        assert_eq!(directives[0].comments, vec!["// a", "// b"]);
        assert_eq!(directives[1].body, vec!["    x", "    y"]);
    }

    #[test]
    fn test_separator_line_goes_to_next_comments() {
        let source = "class A\n    one\n//---\nmethod m";
        let (lines, mut directives) = scan(source);
        segment(&lines, &mut directives);

        assert_eq!(directives[0].body, vec!["    one"]);
        assert_eq!(directives[1].comments, vec!["//---"]);
    }

    #[test]
    fn test_adjacent_directives_have_empty_bodies() {
        let source = "require a\nrequire b\n\nrequire c";
        let (lines, mut directives) = scan(source);
        segment(&lines, &mut directives);

        assert!(directives[0].body.is_empty());
        assert!(directives[1].comments.is_empty());
        assert!(directives[1].body.is_empty());
        assert_eq!(directives[2].comments, vec![""]);
        assert_eq!(reconstruct(&directives), lines);
    }

    #[test]
    fn test_extra_blank_lines_stay_in_previous_body() {
        let source = "class A\n    one\n\n\n//---\nmethod m";
        let (lines, mut directives) = scan(source);
        segment(&lines, &mut directives);

        assert_eq!(directives[0].body, vec!["    one", "", ""]);
        assert_eq!(directives[1].comments, vec!["//---"]);
    }
}
