//! Blog plugin for Tipo.
//!
//! Declares a "blog_post" content type with contextual help and an admin
//! icon. This is a reference plugin demonstrating the declaration API.

use std::sync::Arc;

use serde_json::json;
use tipo_sdk::prelude::*;

/// Admin menu position, just below the built-in posts.
const MENU_POSITION: i64 = 6;

/// Content type declarations provided by the blog plugin.
pub fn declarations() -> DeclarationResult<Vec<Arc<Declaration>>> {
    let post = Declaration::builder("Blog Post")
        .labels(Labels::default().menu("Blog"))
        .icon("f1ea")
        .option("menu_position", MENU_POSITION)
        .option("supports", json!(["title", "editor", "excerpt", "comments"]))
        .option("rewrite", json!({ "slug": "blog" }))
        .help(HelpEntry::new(
            "Posts appear on the blog archive, newest first.",
        ))
        .help(HelpEntry::in_context(
            "edit",
            "The excerpt is shown on the archive page instead of the full body.",
        ))
        .build()?;

    Ok(vec![Arc::new(post)])
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn declares_blog_post() {
        let decls = declarations().unwrap();
        assert_eq!(decls.len(), 1);

        let post = &decls[0];
        assert_eq!(post.identifier(), "blog_post");
        assert_eq!(post.labels().plural, "Blog Posts");
        assert_eq!(post.labels().menu, "Blog");
        assert_eq!(post.icon(), Some("f1ea"));
    }

    #[test]
    fn overrides_replace_defaults() {
        let decls = declarations().unwrap();
        let payload = decls[0].registration_payload(&Identity);

        assert_eq!(payload.get("menu_position"), Some(&json!(MENU_POSITION)));
        assert_eq!(payload.get("rewrite"), Some(&json!({ "slug": "blog" })));
        assert_eq!(payload.get("public"), Some(&json!(true)));
    }

    #[test]
    fn edit_screen_help() {
        let decls = declarations().unwrap();
        let help = decls[0].resolve_help(String::new(), "blog_post");
        assert!(help.contains("archive"));

        let help = decls[0].resolve_help(String::new(), "edit-blog_post");
        assert!(help.contains("excerpt"));
    }
}
