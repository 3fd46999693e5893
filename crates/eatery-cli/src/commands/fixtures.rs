//! Sample eateries for command tests, covering the week of Monday 2025-01-06.

use chrono::{DateTime, Duration, Utc};
use eatery_core::{Day, Eatery, EateryId, Event, Location, PaymentMethod, WaitTimeSample, WaitTimes};

pub fn monday() -> Day {
    "2025-01-06".parse().unwrap()
}

/// Campus-local `hour:minute` on `day`.
pub fn local(day: Day, hour: u32, minute: u32) -> DateTime<Utc> {
    day.to_date(hour, minute)
}

fn event(day: Day, start: (u32, u32), end: (u32, u32), description: &str) -> Event {
    Event::new(
        day,
        local(day, start.0, start.1),
        local(day, end.0, end.1),
        Some(description.to_string()),
    )
    .unwrap()
}

fn weekdays() -> impl Iterator<Item = Day> {
    (0..7)
        .map(|offset| monday().add(offset))
        .filter(|day| day.weekday() <= 5)
}

fn sample(day: Day, hour: u32, minutes: [i64; 3]) -> WaitTimeSample {
    WaitTimeSample {
        timestamp: local(day, hour, 0),
        low: Duration::minutes(minutes[0]),
        expected: Duration::minutes(minutes[1]),
        high: Duration::minutes(minutes[2]),
    }
}

pub fn okenshields() -> Eatery {
    let mut eatery = Eatery::new(EateryId::new("okenshields").unwrap(), "Okenshields");
    eatery.campus_area = Some("Central".to_string());
    eatery.payment_methods = [PaymentMethod::MealSwipes, PaymentMethod::Brbs].into();
    eatery.location = Some(Location::new(42.4465, -76.4853));
    eatery.events = weekdays()
        .flat_map(|day| {
            [
                event(day, (10, 30), (14, 30), "Lunch"),
                event(day, (16, 30), (20, 0), "Dinner"),
            ]
        })
        .collect();
    eatery.wait_times_by_day.insert(
        monday(),
        WaitTimes::new(
            monday(),
            vec![
                sample(monday(), 11, [2, 4, 6]),
                sample(monday(), 12, [5, 8, 12]),
                sample(monday(), 17, [3, 5, 7]),
            ],
        ),
    );
    eatery
}

pub fn trillium() -> Eatery {
    let mut eatery = Eatery::new(EateryId::new("trillium").unwrap(), "Trillium");
    eatery.campus_area = Some("Central".to_string());
    eatery.payment_methods = [PaymentMethod::Brbs, PaymentMethod::Credit].into();
    eatery.location = Some(Location::new(42.4478, -76.4813));
    eatery.events = weekdays()
        .map(|day| event(day, (8, 0), (15, 0), "Lunch"))
        .collect();
    eatery
}

pub fn rpcc() -> Eatery {
    let mut eatery = Eatery::new(
        EateryId::new("rpcc").unwrap(),
        "Robert Purcell Marketplace Eatery",
    );
    eatery.campus_area = Some("North".to_string());
    eatery.payment_methods = [PaymentMethod::MealSwipes].into();
    eatery.events = (0..7)
        .map(|offset| event(monday().add(offset), (7, 0), (21, 0), "All Day"))
        .collect();
    eatery
}

pub fn eateries() -> Vec<Eatery> {
    vec![okenshields(), trillium(), rpcc()]
}
