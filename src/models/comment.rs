use serde::{Deserialize, Serialize};
use chrono::Utc;

pub const ANONYMOUS: &str = "Anonymous";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A comment left on a gallery photo. The photo filename is the key it
/// is stored under.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Comment {
    pub username: String,
    #[serde(default)]
    pub timestamp: String,
    pub text: String,
}

pub fn timestamp_now() -> String {
    Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

/// One line of `comments.txt`: `photo|username|timestamp|text`.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentLine {
    pub photo: String,
    pub comment: Comment,
}

fn single_line(s: &str) -> String {
    s.replace(['\r', '\n'], " ")
}

fn field(s: &str) -> String {
    single_line(s).replace('|', "_")
}

impl CommentLine {
    /// Parses a stored line. Older files hold `photo|text` only; lines
    /// without any separator are not comments.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        let parts: Vec<&str> = line.splitn(4, '|').collect();
        let (photo, comment) = match parts.as_slice() {
            [photo, username, timestamp, text] => (*photo, Comment {
                username: username.to_string(),
                timestamp: timestamp.to_string(),
                text: text.trim().to_string(),
            }),
            // legacy lines may carry `|` inside the text
            [photo, rest @ ..] if !rest.is_empty() => (*photo, Comment {
                username: ANONYMOUS.to_string(),
                timestamp: String::new(),
                text: rest.join("|").trim().to_string(),
            }),
            _ => return None,
        };
        Some(Self { photo: photo.trim().to_string(), comment })
    }

    pub fn to_line(&self) -> String {
        format!(
            "{}|{}|{}|{}\n",
            field(&self.photo),
            field(&self.comment.username),
            field(&self.comment.timestamp),
            single_line(self.comment.text.trim()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_four_field_line_keeping_pipes_in_text() {
        let line = CommentLine::parse("grad.jpg|amani|2025-01-02 10:00:00|so proud | congrats\n").unwrap();
        assert_eq!(line.photo, "grad.jpg");
        assert_eq!(line.comment.username, "amani");
        assert_eq!(line.comment.timestamp, "2025-01-02 10:00:00");
        assert_eq!(line.comment.text, "so proud | congrats");
    }

    #[test]
    fn parses_legacy_two_field_line() {
        let line = CommentLine::parse("grad.jpg|lovely").unwrap();
        assert_eq!(line.comment.username, ANONYMOUS);
        assert_eq!(line.comment.timestamp, "");
        assert_eq!(line.comment.text, "lovely");
    }

    #[test]
    fn legacy_line_with_pipe_in_text() {
        let line = CommentLine::parse("grad.jpg|cats | dogs").unwrap();
        assert_eq!(line.comment.username, ANONYMOUS);
        assert_eq!(line.comment.text, "cats | dogs");
    }

    #[test]
    fn skips_lines_without_separator() {
        assert!(CommentLine::parse("just some text").is_none());
        assert!(CommentLine::parse("").is_none());
    }

    #[test]
    fn written_line_stays_on_one_line() {
        let line = CommentLine {
            photo: "a.png".into(),
            comment: Comment {
                username: "we|ird".into(),
                timestamp: "2025-01-02 10:00:00".into(),
                text: "two\nlines".into(),
            },
        };
        let text = line.to_line();
        assert_eq!(text, "a.png|we_ird|2025-01-02 10:00:00|two lines\n");
        let back = CommentLine::parse(&text).unwrap();
        assert_eq!(back.comment.username, "we_ird");
        assert_eq!(back.comment.text, "two lines");
    }

    #[test]
    fn timestamp_has_expected_shape() {
        let ts = timestamp_now();
        assert!(chrono::NaiveDateTime::parse_from_str(&ts, TIMESTAMP_FORMAT).is_ok());
    }
}
