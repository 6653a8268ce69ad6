//! Text heuristics that mine definitions for candidate term names
//!
//! Every function here is pure (text in, candidates out) so each heuristic
//! category can be exercised on its own. None of them is a grammar: they
//! are permissive filters whose output is checked against the store.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::concept::{Concept, Domain};

/// Maximum related terms mined from one forward seed
pub const MAX_FORWARD_CANDIDATES: usize = 10;

/// Maximum prerequisites considered for one backward target
pub const MAX_BACKWARD_CANDIDATES: usize = 8;

/// Below this many pattern matches the backward pass asks the backend
pub const MIN_PATTERN_PREREQUISITES: usize = 3;

/// Generic words that show up in bold or after "see" but are never concepts
const STOPLIST: &[&str] = &[
    "example",
    "examples",
    "note",
    "notes",
    "proof",
    "see",
    "definition",
    "definitions",
    "theorem",
    "lemma",
    "corollary",
    "property",
    "properties",
    "remark",
    "informal",
    "formal",
    "consequence",
    "uniqueness",
    "notation",
    "where",
    "this",
    "that",
    "these",
    "those",
    "the",
    "and",
    "for",
    "with",
    "also",
    "such",
];

const GREEK_LETTERS: &[&str] = &[
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa",
    "lambda", "mu", "nu", "xi", "omicron", "pi", "rho", "sigma", "tau", "upsilon", "phi", "chi",
    "psi", "omega",
];

/// Leading phrases stripped from plain-text prerequisite fragments
const FILLER_PREFIXES: &[&str] = &[
    "an understanding of ",
    "understanding of ",
    "knowledge of ",
    "familiarity with ",
    "the concept of ",
    "the notion of ",
    "the ",
    "an ",
    "a ",
];

static PATTERNS: OnceLock<TermPatterns> = OnceLock::new();

struct TermPatterns {
    bold: Regex,
    see_also: Regex,
    see_reference: Regex,
    requires: Regex,
    parenthetical: Regex,
    notation: Vec<Regex>,
}

impl TermPatterns {
    fn new() -> Self {
        Self {
            bold: Regex::new(r"\*\*([^*\n]+?)\*\*").expect("bold regex must compile"),
            see_also: Regex::new(r"(?i)\b(?:see also|related to|cf\.)\s*:?\s*([^.;\n()]+)")
                .expect("see_also regex must compile"),
            see_reference: Regex::new(r"(?i)\b(?:see|cf\.)\s+\*\*([^*\n]+)\*\*")
                .expect("see_reference regex must compile"),
            requires: Regex::new(
                r"(?i)\b(?:requires|require|assumes|assume|needs|depends on|presupposes|builds on)\b([^.;\n]*)",
            )
            .expect("requires regex must compile"),
            parenthetical: Regex::new(r"(?i)\((?:see also|see|cf\.)\s+([^)\n]+)\)")
                .expect("parenthetical regex must compile"),
            notation: [
                // inline math: $x$
                r"\$[^$\n]+\$",
                // display math: $$ ... $$, \[ ... \], \( ... \)
                r"(?s)\$\$.+?\$\$",
                r"(?s)\\\[.+?\\\]",
                r"(?s)\\\(.+?\\\)",
                // named environments
                r"\\begin\{[A-Za-z*]+\}",
                // common operator and symbol macros
                r"\\(?:forall|exists|sum|int|prod|frac|lim|sqrt|mathbb|mathbf|mathcal|mathrm|in|notin|subseteq|subset|cup|cap|to|mapsto|infty|partial|nabla|cdot|times|leq|geq|neq|implies|iff|emptyset|alpha|beta|gamma|delta|epsilon|lambda|sigma|theta|phi|psi|omega)(?:[^A-Za-z]|$)",
            ]
            .iter()
            .map(|p| Regex::new(p).expect("notation regex must compile"))
            .collect(),
        }
    }
}

fn patterns() -> &'static TermPatterns {
    PATTERNS.get_or_init(TermPatterns::new)
}

/// Strip emphasis markers, surrounding punctuation and whitespace
fn clean_term(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c: char| c == '*' || c == '_' || c == '"' || c == '\'' || c == '`')
        .trim_end_matches([':', '.', ',', ';'])
        .trim()
        .to_string()
}

/// Split a loose list ("A, B and C") into its items
fn split_list(text: &str) -> Vec<String> {
    text.replace(" and ", ",")
        .replace(" or ", ",")
        .split(',')
        .map(clean_term)
        .filter(|s| !s.is_empty())
        .collect()
}

fn strip_filler(fragment: &str) -> &str {
    let mut rest = fragment.trim();
    loop {
        let prefix = FILLER_PREFIXES.iter().find(|p| {
            rest.get(..p.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(p))
        });
        match prefix {
            Some(prefix) => rest = rest[prefix.len()..].trim_start(),
            None => return rest,
        }
    }
}

/// Spans wrapped in `**bold**`, in order of appearance
pub fn bold_spans(text: &str) -> Vec<String> {
    patterns()
        .bold
        .captures_iter(text)
        .map(|c| clean_term(&c[1]))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Terms following "see also", "related to" or "cf."
pub fn see_also_terms(text: &str) -> Vec<String> {
    patterns()
        .see_also
        .captures_iter(text)
        .flat_map(|c| split_list(&c[1]))
        .collect()
}

/// Bold terms directly referenced with "see **X**" or "cf. **X**"
pub fn see_references(text: &str) -> Vec<String> {
    patterns()
        .see_reference
        .captures_iter(text)
        .map(|c| clean_term(&c[1]))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Terms named in "requires / assumes / needs / depends on" clauses
///
/// Bold spans inside the clause are taken verbatim. A clause without bold
/// spans is split on commas and conjunctions, and only fragments that look
/// like concept names survive.
pub fn requires_terms(text: &str) -> Vec<String> {
    let mut terms = Vec::new();

    for caps in patterns().requires.captures_iter(text) {
        let clause = &caps[1];
        let bold = bold_spans(clause);

        if !bold.is_empty() {
            terms.extend(bold);
            continue;
        }

        terms.extend(
            split_list(clause)
                .iter()
                .map(|fragment| clean_term(strip_filler(fragment)))
                .filter(|term| term.split_whitespace().count() <= 5 && is_likely_concept(term)),
        );
    }

    terms
}

/// Targets of "(see X)" and "(cf. X)" asides
pub fn parenthetical_references(text: &str) -> Vec<String> {
    patterns()
        .parenthetical
        .captures_iter(text)
        .flat_map(|c| split_list(&c[1]))
        .collect()
}

/// Curated foundational terms per domain
pub fn domain_fundamentals(domain: Domain) -> &'static [&'static str] {
    match domain {
        Domain::Math => &[
            "Set",
            "Function",
            "Relation",
            "Subset",
            "Ordered Pair",
            "Cartesian Product",
            "Natural Numbers",
            "Real Numbers",
            "Equivalence Relation",
        ],
        Domain::Physics => &[
            "Mass",
            "Force",
            "Energy",
            "Momentum",
            "Velocity",
            "Acceleration",
            "Newton's Second Law",
        ],
        Domain::Chemistry => &[
            "Atom",
            "Molecule",
            "Electron",
            "Chemical Bond",
            "Mole",
            "Ion",
        ],
        Domain::Biology => &["Cell", "DNA", "Gene", "Protein", "Organism", "Natural Selection"],
        Domain::Cs => &[
            "Algorithm",
            "Data Structure",
            "Turing Machine",
            "Graph",
            "Boolean Logic",
            "Big-O Notation",
        ],
    }
}

/// Fundamentals of `domain` whose name appears anywhere in `text`, ignoring case
pub fn fundamentals_mentioned(text: &str, domain: Domain) -> Vec<String> {
    let lower = text.to_lowercase();
    domain_fundamentals(domain)
        .iter()
        .filter(|term| lower.contains(&term.to_lowercase()))
        .map(|term| term.to_string())
        .collect()
}

/// Permissive filter for candidate names
///
/// Rejects anything under three characters and the generic stoplist; accepts
/// capitalized terms and spelled-out Greek letters.
pub fn is_likely_concept(term: &str) -> bool {
    let term = term.trim();
    if term.chars().count() < 3 {
        return false;
    }

    let lower = term.to_lowercase();
    if STOPLIST.contains(&lower.as_str()) {
        return false;
    }

    term.chars().next().is_some_and(char::is_uppercase) || GREEK_LETTERS.contains(&lower.as_str())
}

/// Trim, drop empties and `exclude`, dedupe ignoring case, keep the first `cap`
pub fn dedupe_candidates<I>(candidates: I, exclude: &str, cap: usize) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let exclude = exclude.trim().to_lowercase();
    let mut seen = HashSet::new();

    candidates
        .into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .filter(|c| {
            let key = c.to_lowercase();
            key != exclude && seen.insert(key)
        })
        .take(cap)
        .collect()
}

/// Parse a comma- or line-separated list returned by the backend
pub fn parse_term_list(text: &str) -> Vec<String> {
    text.split([',', '\n'])
        .map(|item| {
            item.trim()
                .trim_start_matches(|c: char| c == '-' || c == '*' || c == '•' || c.is_ascii_digit())
                .trim_start_matches(['.', ')'])
                .to_string()
        })
        .map(|item| clean_term(&item))
        .filter(|item| !item.is_empty() && item.chars().count() <= 80)
        .collect()
}

/// Whether `text` already carries formal (LaTeX) notation
pub fn has_formal_notation(text: &str) -> bool {
    patterns().notation.iter().any(|re| re.is_match(text))
}

/// Candidate related terms for a forward seed: related list, bold spans, "see also"
pub fn forward_candidates(seed: &Concept) -> Vec<String> {
    let mined = seed
        .related_concepts
        .iter()
        .cloned()
        .chain(bold_spans(&seed.definition_md))
        .chain(see_also_terms(&seed.definition_md))
        .filter(|term| is_likely_concept(term));

    dedupe_candidates(mined, &seed.name, MAX_FORWARD_CANDIDATES)
}

/// Prerequisite names found by pattern matching alone, deduplicated, excluding the target
pub fn pattern_prerequisites(target: &Concept) -> Vec<String> {
    let text = &target.definition_md;
    let found = requires_terms(text)
        .into_iter()
        .chain(see_references(text))
        .chain(parenthetical_references(text).into_iter().filter(|t| is_likely_concept(t)))
        .chain(fundamentals_mentioned(text, target.domain));

    dedupe_candidates(found, &target.name, usize::MAX)
}
