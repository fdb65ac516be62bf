//! Requirement-type classification
//!
//! The requirement-type cell is free text entered by staff, so matching is
//! case-insensitive substring over the spelling variants seen in the
//! source data. The two predicates are independent: a cell naming both
//! requirements lands the row in both output lists.

const PROPERTY_VARIANTS: [&str; 3] = ["findtenant", "find tenant", "finding tenant"];
const INQUIRY_VARIANTS: [&str; 3] = ["findspace", "find space", "finding space"];

/// Result of classifying one requirement-type cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Classification {
    pub property: bool,
    pub inquiry: bool,
}

impl Classification {
    /// Row matched neither predicate and belongs in neither list
    pub fn is_unmatched(&self) -> bool {
        !self.property && !self.inquiry
    }
}

/// Classify a requirement-type cell
pub fn classify_requirement(requirement: &str) -> Classification {
    let lowered = requirement.to_lowercase();
    Classification {
        property: PROPERTY_VARIANTS.iter().any(|v| lowered.contains(v)),
        inquiry: INQUIRY_VARIANTS.iter().any(|v| lowered.contains(v)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_variants() {
        for cell in ["FindTenant", "find tenant", "Finding Tenant", "URGENT findtenant!"] {
            let c = classify_requirement(cell);
            assert!(c.property, "{cell:?} should classify as property");
            assert!(!c.inquiry);
        }
    }

    #[test]
    fn test_inquiry_variants() {
        for cell in ["FindSpace", "find space", "Finding Space near MG Road"] {
            let c = classify_requirement(cell);
            assert!(c.inquiry, "{cell:?} should classify as inquiry");
            assert!(!c.property);
        }
    }

    #[test]
    fn test_unmatched() {
        for cell in ["", "Follow up", "tenant", "space wanted"] {
            assert!(classify_requirement(cell).is_unmatched(), "{cell:?}");
        }
    }

    #[test]
    fn test_both_predicates_can_match() {
        let c = classify_requirement("Finding Tenant / Finding Space");
        assert!(c.property);
        assert!(c.inquiry);
    }
}
