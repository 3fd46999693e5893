//! Composable eatery predicates and the filter toggles that build them.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use rayon::prelude::*;

use crate::eatery::{Eatery, EateryMetadata, MetadataLookup};
use crate::location::Location;
use crate::types::PaymentMethod;

/// Campus areas offered as filter toggles.
pub const NORTH: &str = "North";
pub const WEST: &str = "West";
pub const CENTRAL: &str = "Central";

/// A boolean expression over one eatery and its metadata.
#[derive(Debug, Clone, PartialEq)]
pub enum EateryPredicate {
    True,
    False,
    Not(Box<Self>),
    /// All children hold; an empty list holds.
    And(Vec<Self>),
    /// Some child holds; an empty list does not.
    Or(Vec<Self>),
    AcceptsPaymentMethod(PaymentMethod),
    CampusArea(String),
    /// False when there is no metadata.
    IsFavorite,
    IsOpen,
    /// Walk plus expected wait is strictly under `minutes`. False when the
    /// walk time is unknown.
    UnderNMinutes {
        minutes: i64,
        user_location: Option<Location>,
        departure: DateTime<Utc>,
    },
}

impl EateryPredicate {
    #[must_use]
    pub fn not(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Evaluates against the wall clock.
    pub fn is_satisfied(&self, eatery: &Eatery, metadata: Option<&EateryMetadata>) -> bool {
        self.is_satisfied_at(eatery, metadata, Utc::now())
    }

    /// Evaluates with `now` as the current instant.
    pub fn is_satisfied_at(
        &self,
        eatery: &Eatery,
        metadata: Option<&EateryMetadata>,
        now: DateTime<Utc>,
    ) -> bool {
        match self {
            Self::True => true,
            Self::False => false,
            Self::Not(inner) => !inner.is_satisfied_at(eatery, metadata, now),
            Self::And(children) => children
                .iter()
                .all(|p| p.is_satisfied_at(eatery, metadata, now)),
            Self::Or(children) => children
                .iter()
                .any(|p| p.is_satisfied_at(eatery, metadata, now)),
            Self::AcceptsPaymentMethod(method) => eatery.accepts(*method),
            Self::CampusArea(area) => eatery.campus_area.as_deref() == Some(area.as_str()),
            Self::IsFavorite => metadata.is_some_and(|m| m.is_favorite),
            Self::IsOpen => eatery.status(now).is_open(),
            Self::UnderNMinutes {
                minutes,
                user_location,
                departure,
            } => eatery
                .expected_total_time(user_location.as_ref(), *departure)
                .is_some_and(|total| total < Duration::minutes(*minutes)),
        }
    }
}

/// Filter toggles as presented to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EateryFilter {
    pub under_10_minutes: bool,
    /// Eateries accepting any of these pass.
    pub payment_methods: BTreeSet<PaymentMethod>,
    pub favorites_only: bool,
    pub north: bool,
    pub west: bool,
    pub central: bool,
}

impl EateryFilter {
    /// Whether any toggle differs from its default.
    pub fn is_enabled(&self) -> bool {
        self != &Self::default()
    }

    /// Compiles the toggles into a predicate.
    ///
    /// Each dimension becomes an OR over its selected options and the
    /// dimensions are ANDed together. Dimensions with nothing selected
    /// compile to `True`.
    pub fn predicate(
        &self,
        user_location: Option<Location>,
        departure: DateTime<Utc>,
    ) -> EateryPredicate {
        let under_10 = if self.under_10_minutes {
            EateryPredicate::UnderNMinutes {
                minutes: 10,
                user_location,
                departure,
            }
        } else {
            EateryPredicate::True
        };

        let payment = if self.payment_methods.is_empty() {
            EateryPredicate::True
        } else {
            EateryPredicate::Or(
                self.payment_methods
                    .iter()
                    .map(|m| EateryPredicate::AcceptsPaymentMethod(*m))
                    .collect(),
            )
        };

        let favorites = if self.favorites_only {
            EateryPredicate::IsFavorite
        } else {
            EateryPredicate::True
        };

        let areas: Vec<EateryPredicate> = [(self.north, NORTH), (self.west, WEST), (self.central, CENTRAL)]
            .into_iter()
            .filter(|(selected, _)| *selected)
            .map(|(_, area)| EateryPredicate::CampusArea(area.to_string()))
            .collect();
        let area = if areas.is_empty() {
            EateryPredicate::True
        } else {
            EateryPredicate::Or(areas)
        };

        EateryPredicate::And(vec![under_10, payment, favorites, area])
    }
}

/// Eateries satisfying `predicate` at `now`, in input order.
pub fn filter_eateries<'a, M>(
    eateries: &'a [Eatery],
    metadata: &M,
    predicate: &EateryPredicate,
    now: DateTime<Utc>,
) -> Vec<&'a Eatery>
where
    M: MetadataLookup + Sync + ?Sized,
{
    let matched: Vec<&Eatery> = eateries
        .par_iter()
        .filter(|eatery| {
            let meta = metadata.metadata(&eatery.id);
            predicate.is_satisfied_at(eatery, meta.as_ref(), now)
        })
        .collect();
    tracing::debug!(
        total = eateries.len(),
        matched = matched.len(),
        "filtered eateries"
    );
    matched
}
