//! Naming utilities: identifier cleanup, inflection, reserved member names

use heck::ToPascalCase;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Member names the generated data-access classes already define.
static RESERVED_MEMBERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(Equals|GetHashCode|GetType|ToString|repo|Save|IsNew|Insert|Update|Delete|Exists|SingleOrDefault|Single|First|FirstOrDefault|Fetch|Page|Query)$",
    )
    .expect("reserved member pattern is valid")
});

/// Words that are the same in singular and plural, or are already singular.
const UNCOUNTABLE: &[&str] = &[
    "data",
    "status",
    "news",
    "series",
    "species",
    "metadata",
    "information",
    "equipment",
    "sheep",
    "fish",
    "deer",
    "media",
];

/// (singular, plural)
const IRREGULARS: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("foot", "feet"),
    ("tooth", "teeth"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("index", "indices"),
    ("matrix", "matrices"),
    ("vertex", "vertices"),
    ("ox", "oxen"),
];

/// Plural suffix rules, tried in order; the first match wins.
static SINGULAR_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)(database)s$", "${1}"),
        (r"(?i)(quiz)zes$", "${1}"),
        (r"(?i)(alias|status)(es)?$", "${1}"),
        (r"(?i)(octop|vir)(uses|us|i)$", "${1}us"),
        (r"(?i)^(a)x[ie]s$", "${1}xis"),
        (r"(?i)(cris|test)(is|es)$", "${1}is"),
        (r"(?i)(shoe)s$", "${1}"),
        (r"(?i)(o)es$", "${1}"),
        (r"(?i)(bus)(es)?$", "${1}"),
        (r"(?i)(x|ch|ss|sh)es$", "${1}"),
        (r"(?i)(m)ovies$", "${1}ovie"),
        (r"(?i)([^aeiouy]|qu)ies$", "${1}y"),
        (r"(?i)(lea|loa|thie)ves$", "${1}f"),
        (r"(?i)([lr])ves$", "${1}f"),
        (r"(?i)(tive|hive)s$", "${1}"),
        (r"(?i)([^f])ves$", "${1}fe"),
        (r"(?i)^(analy|ba|diagno|parenthe|progno|synop|the)(sis|ses)$", "${1}sis"),
        (r"(?i)(ss)$", "${1}"),
        (r"(?i)s$", ""),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(pattern).expect("singular rule is valid"),
            replacement,
        )
    })
    .collect()
});

/// Optional casing applied to class and property names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameStyle {
    /// Keep the cleaned database identifier as-is
    #[default]
    Preserve,
    /// `order_items` becomes `OrderItems`
    Pascal,
}

impl NameStyle {
    pub fn apply(&self, name: &str) -> String {
        match self {
            NameStyle::Preserve => name.to_string(),
            NameStyle::Pascal => {
                let pascal = name.to_pascal_case();
                // heck drops everything for names made only of separators
                if pascal.is_empty() {
                    clean_identifier(name)
                } else {
                    clean_identifier(&pascal)
                }
            }
        }
    }
}

/// Make a raw database identifier usable as a generated identifier.
///
/// Characters outside `[A-Za-z0-9_]` become `_`, a leading digit gets a `_`
/// prefix and an empty name becomes `_`. Applying it twice changes nothing.
pub fn clean_identifier(raw: &str) -> String {
    let mut cleaned: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() || cleaned.starts_with(|c: char| c.is_ascii_digit()) {
        cleaned.insert(0, '_');
    }
    cleaned
}

fn is_all_upper(word: &str) -> bool {
    word.chars().any(|c| c.is_alphabetic()) && !word.chars().any(|c| c.is_lowercase())
}

/// Re-case `replacement` the way `original` is cased.
fn match_case(original: &str, replacement: &str) -> String {
    if is_all_upper(original) {
        return replacement.to_uppercase();
    }
    let mut chars = replacement.chars();
    match (original.chars().next(), chars.next()) {
        (Some(first), Some(head)) if first.is_uppercase() => {
            head.to_uppercase().chain(chars).collect()
        }
        _ => replacement.to_string(),
    }
}

/// Split off the last `_`-separated segment, which is the word inflection
/// applies to: `order_items` -> (`order_`, `items`).
fn split_last_segment(name: &str) -> (&str, &str) {
    match name.rfind('_') {
        Some(i) => name.split_at(i + 1),
        None => ("", name),
    }
}

/// Turn a plural table name into a singular class name.
///
/// A heuristic: exceptions first, then irregular nouns, then the ordered
/// suffix rules. Only the last `_`-separated segment changes, its casing is
/// preserved, and an all-uppercase word stays all-uppercase. Wrong guesses
/// are corrected with a `class_name` override.
pub fn singularize(name: &str) -> String {
    let (prefix, word) = split_last_segment(name);
    if word.len() < 3 {
        return name.to_string();
    }

    let lower = word.to_lowercase();
    if UNCOUNTABLE.contains(&lower.as_str()) {
        return name.to_string();
    }

    if let Some((singular, _)) = IRREGULARS.iter().find(|(_, plural)| *plural == lower) {
        return format!("{}{}", prefix, match_case(word, singular));
    }

    for (rule, replacement) in SINGULAR_RULES.iter() {
        if rule.is_match(word) {
            let singular = rule.replace(word, *replacement);
            let singular = if is_all_upper(word) {
                singular.to_uppercase()
            } else {
                singular.into_owned()
            };
            return format!("{}{}", prefix, singular);
        }
    }

    name.to_string()
}

/// Pluralize a word using English grammar rules
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return word.to_string();
    }
    let lower = word.to_lowercase();

    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }

    if let Some((_, plural)) = IRREGULARS.iter().find(|(singular, _)| *singular == lower) {
        return match_case(word, plural);
    }

    // Drops the last `drop` characters of `word` and appends `suffix`
    let suffixed = |drop: usize, suffix: &str| {
        let suffix = if is_all_upper(word) {
            suffix.to_uppercase()
        } else {
            suffix.to_string()
        };
        let stem_end = match drop {
            0 => word.len(),
            n => word.char_indices().rev().nth(n - 1).map_or(0, |(i, _)| i),
        };
        format!("{}{}", &word[..stem_end], suffix)
    };
    let len = word.chars().count();

    // Words ending in -is → -es (analysis → analyses, basis → bases)
    if lower.ends_with("is") && len > 2 {
        return suffixed(2, "es");
    }

    // Words ending in -f or -fe → -ves (leaf → leaves, knife → knives)
    if lower.ends_with("fe") {
        return suffixed(2, "ves");
    }
    let f_to_ves: &[&str] = &[
        "leaf", "shelf", "self", "half", "calf", "loaf", "thief",
    ];
    if f_to_ves.contains(&lower.as_str()) {
        return suffixed(1, "ves");
    }

    // Words ending in -o: some take -es
    let o_to_oes: &[&str] = &["hero", "potato", "tomato", "echo", "veto"];
    if o_to_oes.contains(&lower.as_str()) {
        return suffixed(0, "es");
    }

    // Standard rules: -s, -x, -z, -ch, -sh → add -es
    if ["s", "x", "z", "ch", "sh"].iter().any(|s| lower.ends_with(s)) {
        return suffixed(0, "es");
    }

    // Words ending in consonant + y → -ies
    if lower.ends_with('y') && len > 1 {
        let before_y = word.chars().rev().nth(1).map_or('_', |c| c.to_ascii_lowercase());
        if !"aeiou".contains(before_y) {
            return suffixed(1, "ies");
        }
    }

    suffixed(0, "s")
}

/// Whether `name` collides with a member the generated class already has.
pub fn is_reserved_member(name: &str) -> bool {
    RESERVED_MEMBERS.is_match(name)
}

/// Rewrite a property name that would clash with generated infrastructure.
///
/// A reserved member name gets a `_` prefix; the result is then checked
/// once against the owning class name and prefixed again only if it equals
/// it. Running it on its own output changes nothing.
pub fn escape_member_name(property: &str, class_name: &str) -> String {
    let mut name = RESERVED_MEMBERS.replace(property, "_${1}").into_owned();
    if name == class_name {
        name.insert(0, '_');
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_identifier() {
        assert_eq!(clean_identifier("order items"), "order_items");
        assert_eq!(clean_identifier("user-settings"), "user_settings");
        assert_eq!(clean_identifier("2fa_codes"), "_2fa_codes");
        assert_eq!(clean_identifier("prix€"), "prix_");
        assert_eq!(clean_identifier(""), "_");
    }

    #[test]
    fn test_clean_identifier_idempotent() {
        for raw in ["", "9lives", "a b-c", "Déjà vu", "_ok", "$$", "users"] {
            let once = clean_identifier(raw);
            assert_eq!(clean_identifier(&once), once);
        }
    }

    #[test]
    fn test_singularize() {
        assert_eq!(singularize("Categories"), "Category");
        assert_eq!(singularize("Boxes"), "Box");
        assert_eq!(singularize("Data"), "Data");
        assert_eq!(singularize("users"), "user");
        assert_eq!(singularize("Addresses"), "Address");
        assert_eq!(singularize("Statuses"), "Status");
        assert_eq!(singularize("Status"), "Status");
        assert_eq!(singularize("Movies"), "Movie");
        assert_eq!(singularize("Shelves"), "Shelf");
        assert_eq!(singularize("Knives"), "Knife");
        assert_eq!(singularize("Analyses"), "Analysis");
        assert_eq!(singularize("Databases"), "Database");
        assert_eq!(singularize("Heroes"), "Hero");
    }

    #[test]
    fn test_singularize_irregulars() {
        assert_eq!(singularize("People"), "Person");
        assert_eq!(singularize("children"), "child");
        assert_eq!(singularize("Indices"), "Index");
        assert_eq!(singularize("Mice"), "Mouse");
        assert_eq!(singularize("Oxen"), "Ox");
    }

    #[test]
    fn test_singularize_last_segment_and_case() {
        assert_eq!(singularize("order_items"), "order_item");
        assert_eq!(singularize("USER_ROLES"), "USER_ROLE");
        assert_eq!(singularize("CATEGORIES"), "CATEGORY");
        assert_eq!(singularize("shop_people"), "shop_person");
        assert_eq!(singularize("audit_data"), "audit_data");
        assert_eq!(singularize("us"), "us");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("user"), "users");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("key"), "keys");
        assert_eq!(pluralize("analysis"), "analyses");
        assert_eq!(pluralize("leaf"), "leaves");
        assert_eq!(pluralize("knife"), "knives");
        assert_eq!(pluralize("Person"), "People");
        assert_eq!(pluralize("hero"), "heroes");
        assert_eq!(pluralize("photo"), "photos");
        assert_eq!(pluralize("Category"), "Categories");
        assert_eq!(pluralize("BOX"), "BOXES");
    }

    #[test]
    fn test_pluralize_non_ascii() {
        assert_eq!(pluralize("café"), "cafés");
        assert_eq!(pluralize("Größe"), "Größes");
        assert_eq!(pluralize("straße"), "straßes");
        assert_eq!(pluralize("kölny"), "kölnies");
        assert_eq!(pluralize("éy"), "éies");
        assert_eq!(pluralize("über"), "übers");
        assert_eq!(pluralize("ÉY"), "ÉIES");
        assert_eq!(pluralize("ölkrisis"), "ölkrises");
    }

    #[test]
    fn test_singularize_inverts_pluralize() {
        for word in [
            "user", "category", "box", "address", "match", "dish", "leaf", "knife", "analysis",
            "person", "child", "index", "hero", "key", "Order", "Invoice",
        ] {
            assert_eq!(singularize(&pluralize(word)), word, "word: {}", word);
        }
    }

    #[test]
    fn test_name_style() {
        assert_eq!(NameStyle::Preserve.apply("order_item"), "order_item");
        assert_eq!(NameStyle::Pascal.apply("order_item"), "OrderItem");
        assert_eq!(NameStyle::Pascal.apply("USER_ROLE"), "UserRole");
        assert_eq!(NameStyle::Pascal.apply("_2fa_code"), "_2faCode");
    }

    #[test]
    fn test_reserved_members() {
        assert!(is_reserved_member("Save"));
        assert!(is_reserved_member("FirstOrDefault"));
        assert!(!is_reserved_member("save"));
        assert!(!is_reserved_member("Saved"));
    }

    #[test]
    fn test_escape_member_name() {
        assert_eq!(escape_member_name("Save", "Foo"), "_Save");
        assert_eq!(escape_member_name("Name", "Foo"), "Name");
        assert_eq!(escape_member_name("Foo", "Foo"), "_Foo");
        assert_eq!(escape_member_name("Save", "_Save"), "__Save");
    }

    #[test]
    fn test_escape_member_name_is_stable() {
        for (property, class) in [("Save", "Foo"), ("Foo", "Foo"), ("Query", "Query")] {
            let once = escape_member_name(property, class);
            assert_eq!(escape_member_name(&once, class), once);
        }
    }
}
