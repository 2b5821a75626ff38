/// Levenshtein distance between two strings, counted in chars.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a_len = a.chars().count();
    let b_len = b.chars().count();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.chars().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Candidate with the smallest edit distance to `name`, if that distance is
/// strictly below `threshold`.
///
/// Ties keep the candidate seen first.
///
/// # Examples
/// ```
/// use quire_core::utils::closest_match;
/// let names = ["UserFields", "PostFields"];
/// assert_eq!(closest_match("UserField", names, 10), Some("UserFields"));
/// assert_eq!(closest_match("UserField", names, 1), None);
/// ```
pub fn closest_match<'a, I>(name: &str, candidates: I, threshold: usize) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&'a str, usize)> = None;
    for candidate in candidates {
        let distance = edit_distance(name, candidate);
        if best.is_none_or(|(_, best_distance)| distance < best_distance) {
            best = Some((candidate, distance));
        }
    }
    best.filter(|&(_, distance)| distance < threshold)
        .map(|(candidate, _)| candidate)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Upper,
    Lower,
    Digit,
    Separator,
}

fn classify(c: char) -> CharClass {
    if c.is_ascii_digit() {
        CharClass::Digit
    } else if c.is_uppercase() {
        CharClass::Upper
    } else if c.is_alphabetic() {
        CharClass::Lower
    } else {
        CharClass::Separator
    }
}

/// Split into words the way path-to-identifier slugs expect: on any
/// non-alphanumeric char, on lower→upper transitions, between letters and
/// digits, and before the last capital of an acronym (`HTMLParser` → `HTML`, `Parser`).
fn words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        let class = classify(c);
        if class == CharClass::Separator {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        let prev = i.checked_sub(1).map(|p| classify(chars[p]));
        let next = chars.get(i + 1).map(|&n| classify(n));
        let boundary = match (prev, class) {
            (Some(CharClass::Lower), CharClass::Upper) => true,
            (Some(CharClass::Digit), CharClass::Upper | CharClass::Lower) => true,
            (Some(CharClass::Upper | CharClass::Lower), CharClass::Digit) => true,
            (Some(CharClass::Upper), CharClass::Upper) => next == Some(CharClass::Lower),
            _ => false,
        };
        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Convert any string (typically a relative file path) to kebab-case.
///
/// # Examples
/// ```
/// use quire_core::utils::kebab_case;
/// assert_eq!(kebab_case("src/pages/index.js"), "src-pages-index-js");
/// assert_eq!(kebab_case("src/components/SiteHeader.tsx"), "src-components-site-header-tsx");
/// ```
pub fn kebab_case(s: &str) -> String {
    words(s)
        .iter()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}
