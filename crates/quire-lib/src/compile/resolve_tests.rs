use super::registry::FragmentRegistry;
use super::resolve::{DependencyCache, MissingSpread, resolve};
use crate::source::{RawDocument, SourceId, Span};
use crate::test_utils::raw;

fn fragments() -> Vec<RawDocument> {
    vec![
        raw("a.js", "fragment A on User { id }"),
        raw("b.js", "fragment B on User { ...A name }"),
        raw("c.js", "fragment C on User { ...B friends { ...A } }"),
    ]
}

fn registry(docs: &[RawDocument]) -> FragmentRegistry<'_> {
    let mut registry = FragmentRegistry::new();
    for (idx, doc) in docs.iter().enumerate() {
        registry.merge(SourceId(idx as u32), doc);
    }
    registry
}

fn names(deps: &super::FragmentDeps) -> Vec<&str> {
    let mut names: Vec<_> = deps.fragments.iter().map(String::as_str).collect();
    names.sort_unstable();
    names
}

#[test]
fn resolves_transitive_spreads() {
    let docs = fragments();
    let registry = registry(&docs);
    let op = raw("page.js", "query Q { me { ...C } }");
    let body = &op.document.operations().next().expect("operation").selection_set;

    let mut cache = DependencyCache::new();
    let deps = resolve(&registry, &mut cache, SourceId(3), body);

    assert_eq!(names(&deps), ["A", "B", "C"]);
    assert!(deps.missing.is_empty());
    assert_eq!(cache.len(), 1);
}

#[test]
fn warm_cache_matches_cold_cache() {
    let docs = fragments();
    let registry = registry(&docs);
    let first = raw("one.js", "query One { me { ...B } }");
    let second = raw("two.js", "query Two { me { ...C ...A } }");
    let body = |doc: &RawDocument| {
        doc.document
            .operations()
            .next()
            .expect("operation")
            .selection_set
            .clone()
    };

    let mut warm = DependencyCache::new();
    resolve(&registry, &mut warm, SourceId(3), &body(&first));
    let with_warm = resolve(&registry, &mut warm, SourceId(4), &body(&second));

    let mut cold = DependencyCache::new();
    let with_cold = resolve(&registry, &mut cold, SourceId(4), &body(&second));

    assert_eq!(names(&with_warm), names(&with_cold));
    assert_eq!(names(&with_cold), ["A", "B", "C"]);
    assert!(warm.hits() > 0);
    assert_eq!(warm.get("B").map(names), Some(vec!["A"]));
}

#[test]
fn missing_spread_inside_fragment_points_at_fragment_file() {
    let docs = vec![
        raw("a.js", "fragment A on User { id }"),
        raw("b.js", "fragment B on User { ...Nope ...A }"),
    ];
    let registry = registry(&docs);
    let op = raw("page.js", "{ me { ...B ...Gone } }");
    let body = &op.document.operations().next().expect("operation").selection_set;

    let deps = resolve(&registry, &mut DependencyCache::new(), SourceId(2), body);

    assert_eq!(names(&deps), ["A", "B"]);
    assert_eq!(
        deps.missing,
        [
            MissingSpread {
                name: "Nope".to_string(),
                source: SourceId(1),
                span: Span::new(24, 28),
            },
            MissingSpread {
                name: "Gone".to_string(),
                source: SourceId(2),
                span: Span::new(15, 19),
            },
        ]
    );
}

#[test]
fn cyclic_fragments_terminate() {
    let docs = vec![
        raw("a.js", "fragment A on User { ...B }"),
        raw("b.js", "fragment B on User { friends { ...A } }"),
    ];
    let registry = registry(&docs);
    let op = raw("page.js", "{ me { ...A } }");
    let body = &op.document.operations().next().expect("operation").selection_set;

    let mut cache = DependencyCache::new();
    let deps = resolve(&registry, &mut cache, SourceId(2), body);

    assert_eq!(names(&deps), ["A", "B"]);
    assert!(deps.missing.is_empty());
}
