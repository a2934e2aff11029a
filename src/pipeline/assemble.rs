//! Page assembly: join transliterated lines into one esa document body.
//!
//! Scrapbox stores a page's title again as its first line, so line 0 is
//! turned into the level-1 heading of the post instead of body text.

use crate::config::MigrationConfig;
use crate::pipeline::export::Page;
use crate::pipeline::publish::Post;
use crate::pipeline::transliterate::Transliterator;

/// Build the Markdown body for one page.
///
/// Each raw line produces exactly one newline-terminated output line, in the
/// original order. The first line gets a `# ` prefix. No lines, no body.
pub fn assemble_body<S: AsRef<str>>(transliterator: &Transliterator, lines: &[S]) -> String {
    let mut body = String::new();
    for (i, raw) in lines.iter().enumerate() {
        let line = transliterator.transliterate(raw.as_ref());
        if i == 0 {
            body.push_str("# ");
        }
        body.push_str(&line);
        body.push('\n');
    }
    body
}

/// Build the post payload for one page using the configured constants.
pub fn assemble_post(
    transliterator: &Transliterator,
    page: &Page,
    config: &MigrationConfig,
) -> Post {
    Post {
        name: page.title.clone(),
        body_md: assemble_body(transliterator, &page.lines),
        tags: config.tags.clone(),
        category: config.category.clone(),
        wip: config.wip,
        message: config.message.clone(),
        user: config.user.clone(),
    }
}
