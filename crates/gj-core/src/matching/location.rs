use std::collections::HashMap;
use std::sync::LazyLock;

use strsim::damerau_levenshtein;

use super::similarity::{normalize_text, token_overlap};

/// City alias → canonical name. Canonical names line up with the listing
/// allow-list in `db::postings`.
static CITY_ALIASES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let aliases: &[(&str, &[&str])] = &[
        ("dubai", &["dubai", "dxb", "dubai city", "dubayy"]),
        ("abu dhabi", &["abu dhabi", "abudhabi", "abu zaby"]),
        ("sharjah", &["sharjah", "shj", "al sharjah"]),
        ("ajman", &["ajman", "al ajman"]),
        ("al ain", &["al ain", "alain", "al-ain"]),
        ("ras al khaimah", &["ras al khaimah", "rak", "ras al khaima"]),
        ("fujairah", &["fujairah", "al fujairah", "fujeirah"]),
        ("umm al quwain", &["umm al quwain", "uaq", "umm al qaiwain"]),
    ];

    let mut map = HashMap::new();
    for (canonical, list) in aliases {
        for alias in *list {
            map.insert(*alias, *canonical);
        }
    }
    map
});

/// Canonical city → region. Every allow-listed city currently sits in one
/// region, but candidates routinely write the region instead of a city.
static CITY_REGIONS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("dubai", "uae"),
        ("abu dhabi", "uae"),
        ("sharjah", "uae"),
        ("ajman", "uae"),
        ("al ain", "uae"),
        ("ras al khaimah", "uae"),
        ("fujairah", "uae"),
        ("umm al quwain", "uae"),
    ])
});

const REGION_ALIASES: &[(&str, &str)] = &[
    ("uae", "uae"),
    ("u a e", "uae"),
    ("united arab emirates", "uae"),
    ("emirates", "uae"),
];

// Only fuzz reasonably long names; short aliases would snap to anything.
const FUZZY_MIN_LEN: usize = 5;
const FUZZY_MAX_DISTANCE: usize = 2;

fn alias_lookup(segment: &str) -> Option<&'static str> {
    if let Some(canonical) = CITY_ALIASES.get(segment).copied() {
        return Some(canonical);
    }

    if segment.chars().count() < FUZZY_MIN_LEN {
        return None;
    }

    CITY_ALIASES
        .iter()
        .filter(|(alias, _)| alias.chars().count() >= FUZZY_MIN_LEN)
        .map(|(alias, canonical)| (damerau_levenshtein(segment, alias), *canonical))
        .filter(|(distance, _)| *distance <= FUZZY_MAX_DISTANCE)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, canonical)| canonical)
}

/// Resolve a free-text location to a canonical city, trying the whole string
/// first and then each comma-separated segment ("Dubai, UAE" → "dubai").
pub fn canonical_city(raw: &str) -> Option<&'static str> {
    let normalized = normalize_text(raw);
    if normalized.is_empty() {
        return None;
    }

    if let Some(canonical) = alias_lookup(&normalized) {
        return Some(canonical);
    }

    raw.split(',')
        .map(normalize_text)
        .filter(|segment| !segment.is_empty())
        .find_map(|segment| alias_lookup(&segment))
}

fn region_name(raw: &str) -> Option<&'static str> {
    let segments = std::iter::once(normalize_text(raw))
        .chain(raw.split(',').map(normalize_text))
        .filter(|segment| !segment.is_empty());

    for segment in segments {
        if let Some(&(_, region)) = REGION_ALIASES
            .iter()
            .find(|(alias, _)| *alias == segment.as_str())
        {
            return Some(region);
        }
    }
    None
}

fn region_of_city(canonical: &str) -> Option<&'static str> {
    CITY_REGIONS.get(canonical).copied()
}

/// Similarity between a posting's city and a candidate's preferred location,
/// in [0, 1]. Tolerates aliases ("DXB"), region names ("United Arab
/// Emirates") and small typos; unrelated or empty locations score low.
pub fn location_similarity(city: &str, preferred: &str) -> f64 {
    if normalize_text(city).is_empty() || normalize_text(preferred).is_empty() {
        return 0.0;
    }

    let city_canonical = canonical_city(city);
    let preferred_canonical = canonical_city(preferred);

    match (city_canonical, preferred_canonical) {
        (Some(a), Some(b)) if a == b => return 1.0,
        (Some(a), Some(b)) => {
            if let (Some(ra), Some(rb)) = (region_of_city(a), region_of_city(b)) {
                if ra == rb {
                    return 0.5;
                }
            }
        }
        _ => {}
    }

    // One side names a region covering the other side's city.
    let city_region = city_canonical.and_then(region_of_city).or_else(|| region_name(city));
    let preferred_region = preferred_canonical
        .and_then(region_of_city)
        .or_else(|| region_name(preferred));
    if let (Some(ra), Some(rb)) = (city_region, preferred_region) {
        if ra == rb && (city_canonical.is_none() || preferred_canonical.is_none()) {
            return 0.8;
        }
    }

    0.4 * token_overlap(city, preferred)
}
