use crate::utils::{closest_match, edit_distance, kebab_case};

#[test]
fn edit_distance_basics() {
    assert_eq!(edit_distance("", ""), 0);
    assert_eq!(edit_distance("abc", ""), 3);
    assert_eq!(edit_distance("", "abc"), 3);
    assert_eq!(edit_distance("kitten", "sitting"), 3);
    assert_eq!(edit_distance("UserField", "UserFields"), 1);
}

#[test]
fn edit_distance_counts_chars_not_bytes() {
    assert_eq!(edit_distance("café", "cafe"), 1);
}

#[test]
fn closest_match_suggests_near_name() {
    let names = ["PostFields", "UserFields", "CommentFields"];
    assert_eq!(closest_match("UserField", names, 10), Some("UserFields"));
}

#[test]
fn closest_match_threshold_is_strict() {
    // "abcdefghij" vs "klmnopqrst" differ in all 10 positions
    assert_eq!(edit_distance("abcdefghij", "klmnopqrst"), 10);
    assert_eq!(closest_match("abcdefghij", ["klmnopqrst"], 10), None);
    assert_eq!(closest_match("abcdefghij", ["klmnopqrst"], 11), Some("klmnopqrst"));
}

#[test]
fn closest_match_ties_keep_first() {
    assert_eq!(closest_match("ab", ["aa", "bb"], 10), Some("aa"));
}

#[test]
fn closest_match_empty_candidates() {
    assert_eq!(closest_match("Anything", [], 10), None);
}

#[test]
fn kebab_case_paths() {
    assert_eq!(kebab_case("src/pages/index.js"), "src-pages-index-js");
    assert_eq!(kebab_case("src/pages/page-2.js"), "src-pages-page-2-js");
    assert_eq!(kebab_case("src/templates/blog_post.tsx"), "src-templates-blog-post-tsx");
}

#[test]
fn kebab_case_splits_case_transitions() {
    assert_eq!(kebab_case("SiteHeader"), "site-header");
    assert_eq!(kebab_case("fooBarBaz"), "foo-bar-baz");
    assert_eq!(kebab_case("HTMLParser"), "html-parser");
    assert_eq!(kebab_case("useSEO"), "use-seo");
}

#[test]
fn kebab_case_splits_digits() {
    assert_eq!(kebab_case("page2"), "page-2");
    assert_eq!(kebab_case("v2Beta"), "v-2-beta");
}

#[test]
fn kebab_case_trims_separators() {
    assert_eq!(kebab_case("__foo--bar__"), "foo-bar");
    assert_eq!(kebab_case(""), "");
}

#[test]
fn kebab_case_is_idempotent() {
    let once = kebab_case("src/components/SiteHeader.tsx");
    assert_eq!(kebab_case(&once), once);
}
