//! Derivation of a [`BlogPost`] from an uploaded source file.
//!
//! All functions here are pure: the same file name and content always produce
//! the same post fields (ids and timestamps aside).

use chrono::NaiveDate;
use common::storage::types::blog_post::{BlogPost, PostStatus};

/// Words per minute assumed when estimating read time.
const WORDS_PER_MINUTE: usize = 200;

/// Maximum excerpt length, in characters.
const EXCERPT_MAX_CHARS: usize = 200;

/// The file name without its last extension.
///
/// A trailing dot is kept ("notes." has no extension to strip).
pub fn file_stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() => &name[..idx],
        _ => name,
    }
}

/// Derive the slug from a file name: extension removed, lowercased, runs of
/// non-alphanumeric characters collapsed to a single hyphen.
///
/// Leading and trailing hyphens are kept; the slug is a pure function of the
/// name and doubles as the ingestion idempotency key.
pub fn slug_from_file_name(name: &str) -> String {
    let mut slug = String::new();
    let mut last_was_hyphen = false;

    for c in file_stem(name).to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    slug
}

/// Title from the first content line, leading heading markers stripped.
/// Falls back to the file name without extension when that leaves nothing.
fn title_from_content(content: &str, file_name: &str) -> String {
    let first_line = content.lines().next().unwrap_or_default();
    let stripped = first_line.trim_start_matches('#').trim_start();

    if stripped.is_empty() {
        file_stem(file_name).to_string()
    } else {
        stripped.to_string()
    }
}

/// First non-blank, non-heading line, truncated to 200 characters.
fn excerpt_from_content(content: &str) -> String {
    content
        .lines()
        .find(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .map(|line| line.chars().take(EXCERPT_MAX_CHARS).collect())
        .unwrap_or_default()
}

/// Estimated read time, `ceil(words / 200)` minutes with a minimum of one.
pub fn read_time(content: &str) -> String {
    let words = content.split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    format!("{minutes} min read")
}

/// Assemble a published post from a source file.
pub fn post_from_file(
    file_name: &str,
    content: &str,
    author: &str,
    published: NaiveDate,
) -> BlogPost {
    BlogPost::new(
        title_from_content(content, file_name),
        content.to_string(),
        excerpt_from_content(content),
        author.to_string(),
        slug_from_file_name(file_name),
        published.to_string(),
        read_time(content),
        vec![],
        false,
        PostStatus::Published,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("hello-world.md"), "hello-world");
        assert_eq!(file_stem("archive.tar.gz"), "archive.tar");
        assert_eq!(file_stem("no-extension"), "no-extension");
        assert_eq!(file_stem("trailing-dot."), "trailing-dot.");
    }

    #[test]
    fn test_slug_is_deterministic() {
        let name = "My Great Post!.md";
        assert_eq!(slug_from_file_name(name), slug_from_file_name(name));
    }

    #[test]
    fn test_slug_derivation() {
        assert_eq!(slug_from_file_name("hello-world.md"), "hello-world");
        assert_eq!(slug_from_file_name("My Notes.txt"), "my-notes");
        assert_eq!(slug_from_file_name("A  B__C.md"), "a-b-c");
        // Leading/trailing separators collapse to hyphens but are not trimmed
        assert_eq!(slug_from_file_name("!wow!.md"), "-wow-");
        assert_eq!(slug_from_file_name("1700000000-post.md"), "1700000000-post");
    }

    #[test]
    fn test_title_from_heading_line() {
        assert_eq!(
            title_from_content("# Hello World\n\nBody", "hello-world.md"),
            "Hello World"
        );
        assert_eq!(
            title_from_content("## Nested Heading\n", "x.md"),
            "Nested Heading"
        );
        assert_eq!(title_from_content("Plain first line", "x.md"), "Plain first line");
    }

    #[test]
    fn test_title_falls_back_to_file_name_for_empty_content() {
        assert_eq!(title_from_content("", "my-notes.txt"), "my-notes");
        assert_eq!(title_from_content("#\n\nbody", "my-notes.txt"), "my-notes");
    }

    #[test]
    fn test_excerpt_skips_headings_and_blank_lines() {
        let content = "# Title\n\n## Subtitle\nFirst real paragraph.\nSecond line.";
        assert_eq!(excerpt_from_content(content), "First real paragraph.");
    }

    #[test]
    fn test_excerpt_truncates_to_200_chars() {
        let long_line = "x".repeat(450);
        let content = format!("# Title\n\n{long_line}");
        let excerpt = excerpt_from_content(&content);
        assert_eq!(excerpt.chars().count(), 200);
    }

    #[test]
    fn test_excerpt_empty_when_only_headings() {
        assert_eq!(excerpt_from_content("# Just a title\n\n"), "");
        assert_eq!(excerpt_from_content(""), "");
    }

    #[test]
    fn test_read_time_ceiling_division() {
        let one_word = "hello";
        assert_eq!(read_time(one_word), "1 min read");

        let four_hundred = "word ".repeat(400);
        assert_eq!(read_time(&four_hundred), "2 min read");

        let two_hundred_one = "word ".repeat(201);
        assert_eq!(read_time(&two_hundred_one), "2 min read");
    }

    #[test]
    fn test_read_time_minimum_one_minute() {
        assert_eq!(read_time(""), "1 min read");
    }

    #[test]
    fn test_post_from_empty_file() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date");
        let post = post_from_file("my-notes.txt", "", "Catherine Mwangi", date);

        assert_eq!(post.title, "my-notes");
        assert_eq!(post.excerpt, "");
        assert_eq!(post.slug, "my-notes");
        assert_eq!(post.read_time, "1 min read");
        assert_eq!(post.published_date, "2025-06-01");
        assert_eq!(post.status, PostStatus::Published);
        assert!(post.tags.is_empty());
        assert!(!post.featured);
    }

    #[test]
    fn test_post_from_file_keeps_raw_content() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date");
        let content = "# Hello World\n\nA body paragraph.";
        let post = post_from_file("hello-world.md", content, "Catherine Mwangi", date);

        assert_eq!(post.title, "Hello World");
        assert_eq!(post.content, content);
        assert_eq!(post.excerpt, "A body paragraph.");
        assert_eq!(post.slug, "hello-world");
    }
}
