//! Standard Equipment Ratings
//!
//! Nominal ratings offered by manufacturers for each equipment family.
//! Calculators never interpolate between these values; they round the
//! computed requirement up to the next entry.
//!
//! | Catalog           | Unit | Range        | Basis                  |
//! |-------------------|------|--------------|------------------------|
//! | Circuit breakers  | A    | 6 - 630      | IEC 60898 / 60947-2    |
//! | Transformers      | kVA  | 25 - 3150    | IEC 60076 preferred    |
//! | Generator sets    | kVA  | 20 - 2500    | ISO 8528 prime ratings |
//! | Capacitor banks   | kVAr | 5 - 500      | IEC 60831 step sizes   |
//! | Contactors (AC-3) | A    | 9 - 780      | IEC 60947-4-1          |

use super::StandardCatalog;

/// Miniature and moulded-case circuit breaker ratings
pub const BREAKERS_A: StandardCatalog = StandardCatalog::new(
    "circuit breaker",
    "A",
    &[
        6.0, 10.0, 13.0, 16.0, 20.0, 25.0, 32.0, 40.0, 50.0, 63.0, 80.0, 100.0, 125.0, 160.0,
        200.0, 250.0, 315.0, 400.0, 500.0, 630.0,
    ],
);

/// Distribution transformer ratings
pub const TRANSFORMERS_KVA: StandardCatalog = StandardCatalog::new(
    "transformer",
    "kVA",
    &[
        25.0, 50.0, 63.0, 100.0, 160.0, 250.0, 315.0, 400.0, 500.0, 630.0, 800.0, 1000.0,
        1250.0, 1600.0, 2000.0, 2500.0, 3150.0,
    ],
);

/// Diesel generator set ratings
pub const GENERATORS_KVA: StandardCatalog = StandardCatalog::new(
    "generator",
    "kVA",
    &[
        20.0, 30.0, 45.0, 60.0, 80.0, 100.0, 125.0, 150.0, 200.0, 250.0, 300.0, 350.0, 400.0,
        500.0, 630.0, 750.0, 800.0, 1000.0, 1250.0, 1500.0, 2000.0, 2500.0,
    ],
);

/// Low-voltage capacitor bank ratings
pub const CAPACITOR_BANKS_KVAR: StandardCatalog = StandardCatalog::new(
    "capacitor bank",
    "kVAr",
    &[
        5.0, 10.0, 12.5, 15.0, 20.0, 25.0, 30.0, 40.0, 50.0, 60.0, 75.0, 100.0, 125.0, 150.0,
        200.0, 250.0, 300.0, 400.0, 500.0,
    ],
);

/// Motor contactor ratings (utilisation category AC-3)
pub const CONTACTORS_A: StandardCatalog = StandardCatalog::new(
    "contactor",
    "A",
    &[
        9.0, 12.0, 18.0, 25.0, 32.0, 40.0, 50.0, 65.0, 80.0, 95.0, 115.0, 150.0, 185.0, 225.0,
        265.0, 330.0, 400.0, 500.0, 630.0, 780.0,
    ],
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_extremes() {
        assert_eq!(BREAKERS_A.ratings.first(), Some(&6.0));
        assert_eq!(BREAKERS_A.max(), 630.0);
        assert_eq!(TRANSFORMERS_KVA.max(), 3150.0);
        assert_eq!(GENERATORS_KVA.ratings.first(), Some(&20.0));
        assert_eq!(CAPACITOR_BANKS_KVAR.max(), 500.0);
        assert_eq!(CONTACTORS_A.ratings.first(), Some(&9.0));
    }

    #[test]
    fn test_typical_selections() {
        assert_eq!(TRANSFORMERS_KVA.select(440.0).value, 500.0);
        assert_eq!(GENERATORS_KVA.select(212.5).value, 250.0);
        assert_eq!(CAPACITOR_BANKS_KVAR.select(11.0).value, 12.5);
        assert_eq!(CONTACTORS_A.select(18.87).value, 25.0);
    }
}
