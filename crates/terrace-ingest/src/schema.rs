//! Positional column schema
//!
//! The external sheet carries semantics by column position. That layout is
//! a source contract, so it lives in one versioned struct that can be
//! validated and tested instead of magic indices scattered through the
//! pipeline.

use crate::error::IngestError;

/// Versioned mapping from spreadsheet columns to record fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSchema {
    /// Schema version, bumped whenever the source layout changes
    pub version: u32,
    /// Client name column (A)
    pub name: usize,
    /// Free-text requirement-type column used for classification (B)
    pub requirement_type: usize,
    /// Detail columns carried on every record (C, D, E)
    pub details: [usize; 3],
    /// Client email column (F)
    pub email: usize,
    /// Client phone column (G)
    pub phone: usize,
    /// Client company column (H)
    pub company: usize,
    /// Client city column (K)
    pub city: usize,
}

impl SheetSchema {
    /// The current production layout
    pub fn v1() -> Self {
        Self {
            version: 1,
            name: 0,
            requirement_type: 1,
            details: [2, 3, 4],
            email: 5,
            phone: 6,
            company: 7,
            city: 10,
        }
    }

    /// Check that no two fields map to the same column
    pub fn validate(&self) -> Result<(), IngestError> {
        let mut indices = vec![
            self.name,
            self.requirement_type,
            self.email,
            self.phone,
            self.company,
            self.city,
        ];
        indices.extend_from_slice(&self.details);
        indices.sort_unstable();
        let len = indices.len();
        indices.dedup();
        if indices.len() != len {
            return Err(IngestError::Schema(format!(
                "schema v{} maps two fields to the same column",
                self.version
            )));
        }
        Ok(())
    }

    /// Number of columns a row must span to fill every mapped field
    pub fn width(&self) -> usize {
        let max = [
            self.name,
            self.requirement_type,
            self.email,
            self.phone,
            self.company,
            self.city,
            self.details[0],
            self.details[1],
            self.details[2],
        ]
        .into_iter()
        .max()
        .unwrap_or(0);
        max + 1
    }
}

impl Default for SheetSchema {
    fn default() -> Self {
        Self::v1()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v1_is_valid() {
        let schema = SheetSchema::v1();
        assert!(schema.validate().is_ok());
        assert_eq!(schema.version, 1);
        // City sits in column K, so rows need 11 columns to be complete
        assert_eq!(schema.width(), 11);
    }

    #[test]
    fn test_overlapping_columns_rejected() {
        let schema = SheetSchema {
            email: 0, // collides with name
            ..SheetSchema::v1()
        };
        assert!(matches!(schema.validate(), Err(IngestError::Schema(_))));
    }

    #[test]
    fn test_overlapping_detail_column_rejected() {
        let schema = SheetSchema {
            details: [2, 3, 5], // collides with email
            ..SheetSchema::v1()
        };
        assert!(schema.validate().is_err());
    }
}
