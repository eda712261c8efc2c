//! Splitting one `.shader` file into its vertex and fragment stages.
//!
//! ```text
//! #shader vertex
//! ...vertex GLSL...
//! #shader fragment
//! ...fragment GLSL...
//! ```
use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

/// Source text for both stages of one program.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShaderProgramSource {
    pub vertex: String,
    pub fragment: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ShaderParseError {
    #[error("failed to read shader source: {0}")]
    Io(#[from] io::Error),
    #[error("{line}: source text before any `#shader vertex` or `#shader fragment` line")]
    NoSection { line: usize },
    #[error("{line}: `{text}` names neither a vertex nor a fragment stage")]
    UnknownStage { line: usize, text: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    Vertex,
    Fragment,
}

const MARKER: &str = "#shader";

/// Read `input` line by line, routing lines to the stage named by the last marker.
///
/// Marker lines are dropped; every other line keeps its text and gets a `\n`.
/// Blank lines before the first marker are skipped, anything else there is an error.
pub fn parse_shader(input: impl BufRead) -> Result<ShaderProgramSource, ShaderParseError> {
    let mut source = ShaderProgramSource::default();
    let mut section = None;

    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        // 1-based, the way editors count
        let lc = idx + 1;

        if line.contains(MARKER) {
            section = if line.contains("vertex") {
                Some(Section::Vertex)
            } else if line.contains("fragment") {
                Some(Section::Fragment)
            } else {
                return Err(ShaderParseError::UnknownStage { line: lc, text: line });
            };
            continue;
        }

        let buf = match section {
            Some(Section::Vertex) => &mut source.vertex,
            Some(Section::Fragment) => &mut source.fragment,
            None if line.trim().is_empty() => continue,
            None => return Err(ShaderParseError::NoSection { line: lc }),
        };
        buf.push_str(&line);
        buf.push('\n');
    }

    Ok(source)
}

/// [`parse_shader`] on the file at `path`.
pub fn parse_shader_file(path: impl AsRef<Path>) -> Result<ShaderProgramSource, ShaderParseError> {
    let file = File::open(path.as_ref())?;
    parse_shader(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<ShaderProgramSource, ShaderParseError> {
        parse_shader(text.as_bytes())
    }

    #[test]
    fn splits_the_two_stages() {
        let src = parse("#shader vertex\nA\n#shader fragment\nB\nC\n").unwrap();
        assert_eq!(src.vertex, "A\n");
        assert_eq!(src.fragment, "B\nC\n");
    }

    #[test]
    fn line_counts_survive_and_markers_are_dropped() {
        for (n, m) in [(0, 0), (1, 7), (12, 3), (40, 40)] {
            let mut text = String::from("#shader vertex\n");
            for i in 0..n {
                text.push_str(&format!("vertex line {i}\n"));
            }
            text.push_str("#shader fragment\n");
            for i in 0..m {
                text.push_str(&format!("fragment line {i}\n"));
            }

            let src = parse(&text).unwrap();
            assert_eq!(src.vertex.lines().count(), n);
            assert_eq!(src.fragment.lines().count(), m);
            assert_eq!(src.vertex.matches('\n').count(), n);
            assert_eq!(src.fragment.matches('\n').count(), m);
            assert!(!src.vertex.contains(MARKER));
            assert!(!src.fragment.contains(MARKER));
        }
    }

    #[test]
    fn last_line_without_newline_still_gets_one() {
        let src = parse("#shader fragment\nvoid main() {}").unwrap();
        assert_eq!(src.fragment, "void main() {}\n");
        assert!(src.vertex.is_empty());
    }

    #[test]
    fn sections_can_repeat_and_accumulate() {
        let src = parse("#shader vertex\na\n#shader fragment\nb\n#shader vertex\nc\n").unwrap();
        assert_eq!(src.vertex, "a\nc\n");
        assert_eq!(src.fragment, "b\n");
    }

    #[test]
    fn vertex_wins_when_a_marker_names_both() {
        let src = parse("#shader vertex fragment\nx\n").unwrap();
        assert_eq!(src.vertex, "x\n");
    }

    #[test]
    fn marker_match_is_case_sensitive() {
        let err = parse("#shader Vertex\nx\n").unwrap_err();
        assert!(matches!(err, ShaderParseError::UnknownStage { line: 1, .. }));
    }

    #[test]
    fn text_before_first_marker_is_rejected() {
        let err = parse("\n#version 330 core\n#shader vertex\n").unwrap_err();
        assert!(matches!(err, ShaderParseError::NoSection { line: 2 }));
    }

    #[test]
    fn leading_blank_lines_are_fine() {
        let src = parse("\n   \n#shader vertex\nx\n").unwrap();
        assert_eq!(src.vertex, "x\n");
    }

    #[test]
    fn crlf_lines_are_normalized() {
        let src = parse("#shader vertex\r\nA\r\n#shader fragment\r\nB\r\n").unwrap();
        assert_eq!(src.vertex, "A\n");
        assert_eq!(src.fragment, "B\n");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = parse_shader_file("definitely/not/here.shader").unwrap_err();
        assert!(matches!(err, ShaderParseError::Io(_)));
    }
}
