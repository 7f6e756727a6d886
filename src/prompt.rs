//! Natural-language prompt construction from personalization attributes.

use crate::error::CardError;
use crate::model::{non_blank, Attributes};

const OPENING: &str = "A vibrant birthday scene for a";
const LAYOUT_CLAUSE: &str = ", designed in a vertical layout for a card";
const CLOSING_CLAUSE: &str = ". Include birthday cake, balloons, and appropriate decorations.";

/// Build the image prompt for the given attributes.
///
/// Clause order is fixed: age, gender, layout, interests, style, color
/// scheme, closing. Attribute text is interpolated verbatim.
///
/// # Errors
///
/// Returns [`CardError::InvalidInput`] if `age` is empty or whitespace.
pub fn build_prompt(attributes: &Attributes) -> Result<String, CardError> {
    let age = attributes.age.trim();
    if age.is_empty() {
        return Err(CardError::InvalidInput("Age must be provided".into()));
    }

    let mut prompt = format!("{OPENING} {age}-year-old");

    if let Some(gender) = non_blank(attributes.gender.as_deref()) {
        prompt.push(' ');
        prompt.push_str(gender);
    }

    prompt.push_str(LAYOUT_CLAUSE);

    if let Some(interests) = join_interests(&attributes.interests) {
        prompt.push_str(", featuring elements related to ");
        prompt.push_str(&interests);
    }

    if let Some(style) = non_blank(attributes.style.as_deref()) {
        prompt.push_str(&format!(", in a {style} style"));
    }

    if let Some(colors) = non_blank(attributes.color_scheme.as_deref()) {
        prompt.push_str(&format!(", using a {colors} color scheme"));
    }

    prompt.push_str(CLOSING_CLAUSE);
    Ok(prompt)
}

/// Join interests as "a, b and c"; `None` for an empty list.
fn join_interests(interests: &[String]) -> Option<String> {
    match interests {
        [] => None,
        [only] => Some(only.clone()),
        [init @ .., last] => Some(format!("{} and {last}", init.join(", "))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_only_prompt() {
        let prompt = build_prompt(&Attributes::with_age(5)).unwrap();
        assert_eq!(
            prompt,
            "A vibrant birthday scene for a 5-year-old, designed in a vertical layout for a card. \
             Include birthday cake, balloons, and appropriate decorations."
        );
    }

    #[test]
    fn full_attributes_prompt() {
        let attrs = Attributes::with_age(30)
            .gender("woman")
            .interests(["travel", "photography", "cats"])
            .style("watercolor")
            .color_scheme("pastel")
            .name("Alice");
        let prompt = build_prompt(&attrs).unwrap();
        assert!(prompt.contains("30-year-old woman"));
        assert!(prompt.contains("featuring elements related to travel, photography and cats"));
        assert!(prompt.contains("watercolor style"));
        assert!(prompt.contains("pastel color scheme"));
        assert!(prompt.ends_with(CLOSING_CLAUSE));
        assert!(!prompt.contains("Alice"));
    }

    #[test]
    fn clause_order_is_fixed() {
        let attrs = Attributes::with_age(9)
            .gender("boy")
            .interests(["dinosaurs"])
            .style("comic")
            .color_scheme("neon");
        let prompt = build_prompt(&attrs).unwrap();
        let clauses = ["9-year-old boy", "vertical layout", "dinosaurs", "comic", "neon", "cake"];
        let positions: Vec<usize> = clauses
            .iter()
            .map(|needle| prompt.find(needle).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{prompt}");
    }

    #[test]
    fn single_interest_has_no_conjunction() {
        let prompt = build_prompt(&Attributes::with_age(12).interests(["soccer"])).unwrap();
        assert!(prompt.contains("related to soccer."));
        assert!(!prompt.contains(" and "));
    }

    #[test]
    fn two_interests_joined_with_and() {
        assert_eq!(join_interests(&["a".into(), "b".into()]).as_deref(), Some("a and b"));
    }

    #[test]
    fn empty_interests_omit_clause() {
        let attrs = Attributes::with_age(40).interests(Vec::<String>::new());
        let prompt = build_prompt(&attrs).unwrap();
        assert!(!prompt.contains("featuring"));
    }

    #[test]
    fn blank_optionals_are_omitted() {
        let attrs = Attributes::with_age(5).gender("").style("  ").color_scheme("");
        assert_eq!(build_prompt(&attrs).unwrap(), build_prompt(&Attributes::with_age(5)).unwrap());
    }

    #[test]
    fn deterministic() {
        let attrs = Attributes::with_age(30).gender("man").interests(["chess", "jazz"]);
        assert_eq!(build_prompt(&attrs).unwrap(), build_prompt(&attrs).unwrap());
    }

    #[test]
    fn missing_age_is_invalid_input() {
        assert!(matches!(build_prompt(&Attributes::default()), Err(CardError::InvalidInput(_))));
        assert!(matches!(
            build_prompt(&Attributes::with_age("  ")),
            Err(CardError::InvalidInput(_))
        ));
    }

    #[test]
    fn attribute_text_is_verbatim() {
        let prompt = build_prompt(&Attributes::with_age(3).style("\"quoted\" & <odd>")).unwrap();
        assert!(prompt.contains("in a \"quoted\" & <odd> style"));
    }
}
