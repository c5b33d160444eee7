//! Seeds the database with random units for demo and load-test setups.
//!
//! Enabled through `data_initializer.enabled`. The ids of the generated units
//! are returned to the caller so they can be removed again on shutdown.

use domain::models::AccommodationType;
use domain::services::pricing;
use fake::Fake;
use persistence::repositories::{UnitInput, UnitRepository};
use rand::Rng;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::middleware::metrics::record_units_generated;

/// Actor recorded on events produced by the service itself.
pub const SYSTEM_USER_ID: Uuid = Uuid::from_u128(1);

const MAX_ROOMS: i32 = 5;
const MAX_FLOOR: i32 = 20;
/// Base price bounds in cents.
const MIN_BASE_PRICE_CENTS: i64 = 5_000;
const MAX_BASE_PRICE_CENTS: i64 = 50_000;

/// Generates random units through the regular unit repository.
pub struct UnitGenerator {
    repo: UnitRepository,
    markup_percent: Decimal,
}

impl UnitGenerator {
    pub fn new(pool: PgPool, markup_percent: Decimal) -> Self {
        Self {
            repo: UnitRepository::new(pool),
            markup_percent,
        }
    }

    /// Creates `count` random units and returns their ids.
    pub async fn generate(&self, count: usize) -> Result<Vec<Uuid>, sqlx::Error> {
        info!(count, "Generating random units");

        let inputs: Vec<UnitInput> = {
            let mut rng = rand::thread_rng();
            (0..count)
                .map(|_| random_unit(&mut rng, self.markup_percent))
                .collect()
        };

        let mut ids = Vec::with_capacity(count);
        for input in &inputs {
            let unit = self.repo.create(input, SYSTEM_USER_ID).await?;
            ids.push(unit.id);
        }

        record_units_generated(ids.len());
        info!(count = ids.len(), "Generated units");
        Ok(ids)
    }

    /// Deletes previously generated units.
    pub async fn cleanup(&self, ids: &[Uuid]) -> Result<u64, sqlx::Error> {
        if ids.is_empty() {
            return Ok(0);
        }
        info!(count = ids.len(), "Cleaning up generated units");
        let deleted = self.repo.delete_many(ids).await?;
        info!(deleted, "Cleanup completed");
        Ok(deleted)
    }
}

fn random_unit<R: Rng + ?Sized>(rng: &mut R, markup_percent: Decimal) -> UnitInput {
    let accommodation_type = AccommodationType::ALL[rng.gen_range(0..AccommodationType::ALL.len())];
    let number_of_rooms: i32 = (1..=MAX_ROOMS).fake_with_rng(rng);
    let floor: i32 = (1..=MAX_FLOOR).fake_with_rng(rng);
    let cents: i64 = (MIN_BASE_PRICE_CENTS..=MAX_BASE_PRICE_CENTS).fake_with_rng(rng);
    let base_price = Decimal::new(cents, 2);

    UnitInput {
        number_of_rooms,
        accommodation_type,
        floor,
        base_price,
        total_price: pricing::total_price(base_price, markup_percent),
        description: describe(accommodation_type, number_of_rooms, floor),
    }
}

/// "flat with 2 rooms on the 3rd floor."
fn describe(accommodation_type: AccommodationType, rooms: i32, floor: i32) -> String {
    format!(
        "{} with {} {} on the {}{} floor.",
        accommodation_type.as_str().to_lowercase(),
        rooms,
        if rooms == 1 { "room" } else { "rooms" },
        floor,
        ordinal_suffix(floor)
    )
}

fn ordinal_suffix(n: i32) -> &'static str {
    if (11..=13).contains(&(n % 100)) {
        return "th";
    }
    match n % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::str::FromStr;

    #[test]
    fn test_ordinal_suffix() {
        let cases = [
            (1, "st"),
            (2, "nd"),
            (3, "rd"),
            (4, "th"),
            (11, "th"),
            (12, "th"),
            (13, "th"),
            (20, "th"),
            (21, "st"),
            (22, "nd"),
            (113, "th"),
        ];
        for (n, expected) in cases {
            assert_eq!(ordinal_suffix(n), expected, "floor {}", n);
        }
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            describe(AccommodationType::Flat, 2, 3),
            "flat with 2 rooms on the 3rd floor."
        );
        assert_eq!(
            describe(AccommodationType::Home, 1, 12),
            "home with 1 room on the 12th floor."
        );
    }

    #[test]
    fn test_system_user_id() {
        assert_eq!(
            SYSTEM_USER_ID,
            Uuid::from_str("00000000-0000-0000-0000-000000000001").unwrap()
        );
    }

    #[test]
    fn test_random_unit_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let markup = Decimal::new(15, 0);
        for _ in 0..200 {
            let unit = random_unit(&mut rng, markup);
            assert!((1..=MAX_ROOMS).contains(&unit.number_of_rooms));
            assert!((1..=MAX_FLOOR).contains(&unit.floor));
            assert!(unit.base_price >= Decimal::new(MIN_BASE_PRICE_CENTS, 2));
            assert!(unit.base_price <= Decimal::new(MAX_BASE_PRICE_CENTS, 2));
            assert_eq!(unit.base_price.scale(), 2);
            assert_eq!(unit.total_price, pricing::total_price(unit.base_price, markup));
            assert!(unit.description.ends_with(" floor."));
        }
    }
}
