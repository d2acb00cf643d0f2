//! Markdown to styled terminal text.
//!
//! Stateless: every redraw re-renders from the message source.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

fn heading_style() -> Style {
    Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
}

fn code_style() -> Style {
    Style::default().fg(Color::Yellow)
}

fn fence_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Render a markdown string into styled lines.
pub fn render_markdown(source: &str) -> Vec<Line<'static>> {
    let parser = Parser::new_ext(source, Options::ENABLE_STRIKETHROUGH);

    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut style = Style::default();
    let mut in_code_block = false;
    // One entry per open list; `Some(n)` carries the next ordered index.
    let mut list_stack: Vec<Option<u64>> = Vec::new();

    fn flush(lines: &mut Vec<Line<'static>>, spans: &mut Vec<Span<'static>>) {
        if !spans.is_empty() {
            lines.push(Line::from(std::mem::take(spans)));
        }
    }

    for event in parser {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                flush(&mut lines, &mut spans);
                style = heading_style();
                let prefix = "#".repeat(level as usize) + " ";
                spans.push(Span::styled(prefix, style));
            }
            Event::End(TagEnd::Heading(_)) => {
                flush(&mut lines, &mut spans);
                style = Style::default();
            }

            Event::Start(Tag::Paragraph) => {}
            Event::End(TagEnd::Paragraph) => {
                flush(&mut lines, &mut spans);
            }

            Event::Start(Tag::CodeBlock(kind)) => {
                flush(&mut lines, &mut spans);
                in_code_block = true;
                style = code_style();
                let lang = match kind {
                    CodeBlockKind::Fenced(lang) => lang.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                lines.push(Line::styled(format!("```{lang}"), fence_style()));
            }
            Event::End(TagEnd::CodeBlock) => {
                flush(&mut lines, &mut spans);
                in_code_block = false;
                lines.push(Line::styled("```", fence_style()));
                style = Style::default();
            }

            Event::Start(Tag::List(start)) => {
                flush(&mut lines, &mut spans);
                list_stack.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                flush(&mut lines, &mut spans);
                list_stack.pop();
            }
            Event::Start(Tag::Item) => {
                flush(&mut lines, &mut spans);
                let indent = "  ".repeat(list_stack.len().saturating_sub(1));
                let marker = match list_stack.last_mut() {
                    Some(Some(index)) => {
                        let marker = format!("{index}. ");
                        *index += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                spans.push(Span::raw(indent));
                spans.push(Span::styled(marker, Style::default().fg(Color::Green)));
            }
            Event::End(TagEnd::Item) => {
                flush(&mut lines, &mut spans);
            }

            Event::Start(Tag::Strong) => style = style.add_modifier(Modifier::BOLD),
            Event::End(TagEnd::Strong) => style = style.remove_modifier(Modifier::BOLD),
            Event::Start(Tag::Emphasis) => style = style.add_modifier(Modifier::ITALIC),
            Event::End(TagEnd::Emphasis) => style = style.remove_modifier(Modifier::ITALIC),
            Event::Start(Tag::Strikethrough) => {
                style = style.add_modifier(Modifier::CROSSED_OUT)
            }
            Event::End(TagEnd::Strikethrough) => {
                style = style.remove_modifier(Modifier::CROSSED_OUT)
            }

            Event::Text(text) => {
                for (i, text_line) in text.lines().enumerate() {
                    if i > 0 {
                        flush(&mut lines, &mut spans);
                    }
                    spans.push(Span::styled(text_line.to_string(), style));
                }
                if in_code_block && text.ends_with('\n') {
                    flush(&mut lines, &mut spans);
                }
            }
            Event::Code(text) => {
                spans.push(Span::styled(text.to_string(), code_style()));
            }
            Event::SoftBreak => spans.push(Span::styled(" ", style)),
            Event::HardBreak => flush(&mut lines, &mut spans),
            Event::Rule => {
                flush(&mut lines, &mut spans);
                lines.push(Line::styled("─".repeat(30), fence_style()));
            }
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                spans.push(Span::styled(marker, Style::default().fg(Color::Yellow)));
            }

            _ => {}
        }
    }

    flush(&mut lines, &mut spans);
    if lines.is_empty() {
        lines.push(Line::from(""));
    }
    lines
}

/// Word-wrap a styled line to `width` columns, keeping each word's style.
///
/// Lines that already fit are returned untouched, which also preserves
/// leading whitespace in short code lines; a single word longer than the
/// width gets its own line rather than being split.
pub fn wrap_line(line: &Line<'static>, width: usize) -> Vec<Line<'static>> {
    if width == 0 || line.width() <= width {
        return vec![line.clone()];
    }

    let mut wrapped: Vec<Line<'static>> = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut column = 0usize;

    for span in &line.spans {
        for word in span.content.split_whitespace() {
            let word_width = word.chars().count();
            if column > 0 && column + 1 + word_width > width {
                wrapped.push(Line::from(std::mem::take(&mut current)));
                column = 0;
            }
            if column > 0 {
                current.push(Span::styled(" ", span.style));
                column += 1;
            }
            current.push(Span::styled(word.to_string(), span.style));
            column += word_width;
        }
    }

    if !current.is_empty() {
        wrapped.push(Line::from(current));
    }
    if wrapped.is_empty() {
        wrapped.push(Line::from(""));
    }
    wrapped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn plain_text_is_a_single_line() {
        let lines = render_markdown("hello world");
        assert_eq!(lines.len(), 1);
        assert_eq!(line_text(&lines[0]), "hello world");
    }

    #[test]
    fn bold_spans_carry_the_modifier() {
        let lines = render_markdown("a **bold** word");
        let bold = lines[0]
            .spans
            .iter()
            .find(|span| span.content == "bold")
            .unwrap();
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn headings_keep_their_prefix() {
        let lines = render_markdown("## Title");
        assert_eq!(line_text(&lines[0]), "## Title");
        assert!(lines[0].spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn bullet_lists_get_markers() {
        let lines = render_markdown("- first\n- second");
        assert_eq!(line_text(&lines[0]), "• first");
        assert_eq!(line_text(&lines[1]), "• second");
    }

    #[test]
    fn ordered_lists_count_up() {
        let lines = render_markdown("1. one\n2. two");
        assert_eq!(line_text(&lines[0]), "1. one");
        assert_eq!(line_text(&lines[1]), "2. two");
    }

    #[test]
    fn code_blocks_are_fenced() {
        let lines = render_markdown("```rust\nlet x = 1;\n```");
        let texts: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(texts, vec!["```rust", "let x = 1;", "```"]);
    }

    #[test]
    fn wrap_leaves_short_lines_alone() {
        let line = Line::from("short");
        assert_eq!(wrap_line(&line, 20).len(), 1);
    }

    #[test]
    fn wrap_breaks_at_word_boundaries() {
        let line = Line::from("one two three four");
        let wrapped = wrap_line(&line, 9);
        let texts: Vec<String> = wrapped.iter().map(line_text).collect();
        assert_eq!(texts, vec!["one two", "three", "four"]);
    }

    #[test]
    fn wrap_preserves_span_styles() {
        let style = Style::default().fg(Color::Blue);
        let line = Line::from(vec![Span::styled(
            "alpha beta gamma delta".to_string(),
            style,
        )]);
        for wrapped in wrap_line(&line, 12) {
            for span in &wrapped.spans {
                assert_eq!(span.style, style);
            }
        }
    }
}
