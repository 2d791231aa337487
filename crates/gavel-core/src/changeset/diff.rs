//! Unified diff reading.
//!
//! Reconstructs the new side of a patch (context plus added lines) together
//! with a map from reconstructed lines to real new-file line numbers, so
//! facts extracted from patched files cite lines a reviewer can click.

use super::types::ChangeError;

/// New-side view of a unified diff for one file.
#[derive(Debug, Clone)]
pub struct PatchView {
    /// Context and added lines, concatenated in hunk order.
    pub content: String,
    /// `line_map[i]` is the 1-based new-file line number of content line `i`.
    pub line_map: Vec<u32>,
    /// New-file line numbers of added (`+`) lines.
    pub added_lines: Vec<u32>,
}

impl PatchView {
    /// Translate a 0-based line in `content` to a 1-based new-file line.
    pub fn map_line(&self, content_line: u32) -> u32 {
        self.line_map
            .get(content_line as usize)
            .copied()
            .unwrap_or(content_line + 1)
    }
}

/// Parse a unified diff and keep its new side.
pub fn new_side(path: &str, patch: &str) -> Result<PatchView, ChangeError> {
    let mut content = String::new();
    let mut line_map = Vec::new();
    let mut added_lines = Vec::new();
    let mut new_line: u32 = 0;
    let mut in_hunk = false;
    let mut hunks = 0usize;

    for (idx, line) in patch.lines().enumerate() {
        if line.starts_with("@@") {
            new_line = parse_hunk_header(line).ok_or_else(|| ChangeError::MalformedHunk {
                path: path.to_string(),
                line: idx + 1,
                reason: format!("cannot read new-side start from {:?}", line),
            })?;
            in_hunk = true;
            hunks += 1;
            continue;
        }

        // File headers and git metadata between hunks.
        if line.starts_with("--- ")
            || line.starts_with("+++ ")
            || line.starts_with("diff ")
            || line.starts_with("index ")
        {
            in_hunk = false;
            continue;
        }

        if !in_hunk {
            continue;
        }

        match line.as_bytes().first() {
            Some(b'+') => {
                content.push_str(&line[1..]);
                content.push('\n');
                line_map.push(new_line);
                added_lines.push(new_line);
                new_line += 1;
            }
            Some(b' ') => {
                content.push_str(&line[1..]);
                content.push('\n');
                line_map.push(new_line);
                new_line += 1;
            }
            Some(b'-') => {} // old side only
            Some(b'\\') => {} // "\ No newline at end of file"
            None => {
                // A bare empty line inside a hunk is an empty context line.
                content.push('\n');
                line_map.push(new_line);
                new_line += 1;
            }
            _ => {
                return Err(ChangeError::MalformedHunk {
                    path: path.to_string(),
                    line: idx + 1,
                    reason: format!("unexpected line prefix in {:?}", line),
                });
            }
        }
    }

    if hunks == 0 {
        return Err(ChangeError::EmptyPatch { path: path.to_string() });
    }

    Ok(PatchView { content, line_map, added_lines })
}

/// Read the new-side start line out of `@@ -a,b +c,d @@`.
fn parse_hunk_header(line: &str) -> Option<u32> {
    let plus = line.split_whitespace().find(|tok| tok.starts_with('+'))?;
    let start = plus[1..].split(',').next()?;
    start.parse::<u32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATCH: &str = "\
--- a/src/main/java/OrderService.java
+++ b/src/main/java/OrderService.java
@@ -1,4 +1,5 @@
 public class OrderService {
+    @Autowired
     private OrderRepository repo;
 }
";

    #[test]
    fn test_new_side_reconstruction() {
        let view = new_side("OrderService.java", PATCH).unwrap();
        assert!(view.content.contains("@Autowired"));
        // Added line is line 2 of the new file.
        assert_eq!(view.added_lines, vec![2]);
        // First content line maps to new-file line 1.
        assert_eq!(view.map_line(0), 1);
        assert_eq!(view.map_line(1), 2);
        assert_eq!(view.map_line(2), 3);
    }

    #[test]
    fn test_hunk_header_without_count() {
        assert_eq!(parse_hunk_header("@@ -0,0 +1 @@"), Some(1));
        assert_eq!(parse_hunk_header("@@ -3,2 +7,4 @@ class X"), Some(7));
        assert_eq!(parse_hunk_header("@@ garbage @@"), None);
    }

    #[test]
    fn test_empty_patch_rejected() {
        let err = new_side("X.java", "no hunks here").unwrap_err();
        assert!(matches!(err, ChangeError::EmptyPatch { .. }));
    }

    #[test]
    fn test_malformed_prefix_rejected() {
        let patch = "@@ -1,1 +1,1 @@\n?bogus\n";
        let err = new_side("X.java", patch).unwrap_err();
        assert!(matches!(err, ChangeError::MalformedHunk { line: 2, .. }));
    }
}
