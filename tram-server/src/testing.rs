//! Shared timetable fixtures for tests.

use chrono::NaiveDate;

use crate::domain::{
    AgencyId, CompositeId, CompositeStation, DaysOfWeek, Direction, FeedInfo, LatLong, Route,
    RouteId, Service, ServiceCalendar, ServiceId, Station, StationId, StopCall, TimePoint, TransportMode,
    Trip, TripId,
};
use crate::timetable::Timetable;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn monday() -> NaiveDate {
    date(2024, 3, 18)
}

pub fn sunday() -> NaiveDate {
    date(2024, 3, 17)
}

pub fn t(s: &str) -> TimePoint {
    TimePoint::parse(s).unwrap()
}

pub fn station(id: &str, mode: TransportMode, lat: f64, lon: f64) -> Station {
    Station::new(id, id, mode, LatLong::new(lat, lon))
}

pub fn route(id: &str, mode: TransportMode) -> Route {
    Route {
        id: RouteId::new(id),
        short_name: id.to_string(),
        long_name: String::new(),
        agency: AgencyId::new("AG"),
        mode,
        direction: Direction::Outbound,
    }
}

pub fn service(id: &str, days: DaysOfWeek) -> Service {
    Service {
        id: ServiceId::new(id),
        calendar: ServiceCalendar::new(days, date(2024, 1, 1), date(2024, 12, 31)),
    }
}

/// A trip whose calls arrive and depart at the same minute.
pub fn trip(id: &str, route: &str, service: &str, calls: &[(&str, &str)]) -> Trip {
    Trip {
        id: TripId::new(id),
        service: ServiceId::new(service),
        route: RouteId::new(route),
        headsign: String::new(),
        calls: calls
            .iter()
            .enumerate()
            .map(|(i, (station, time))| StopCall::new(*station, t(time), t(time), i as u32 + 1))
            .collect(),
    }
}

fn feed() -> FeedInfo {
    FeedInfo {
        version: "test-1".into(),
        valid_from: date(2024, 1, 1),
        valid_until: date(2024, 12, 31),
    }
}

/// A timetable of stations alone, with no routes or trips.
pub fn stations_only(stations: Vec<Station>) -> Timetable {
    Timetable {
        feed: feed(),
        agencies: Vec::new(),
        stations,
        platforms: Vec::new(),
        composites: Vec::new(),
        routes: Vec::new(),
        services: Vec::new(),
        trips: Vec::new(),
        interchanges: Default::default(),
    }
}

/// R1 calls A, B, C at 10:00, 10:05, 10:10 and R2 calls C, D at 10:12,
/// 10:20, both on Mondays only. Stations are kilometres apart.
pub fn two_route_timetable() -> Timetable {
    let mut timetable = stations_only(vec![
        station("A", TransportMode::Tram, 53.40, -2.30),
        station("B", TransportMode::Tram, 53.42, -2.28),
        station("C", TransportMode::Tram, 53.44, -2.26),
        station("D", TransportMode::Tram, 53.46, -2.24),
    ]);
    timetable.routes = vec![route("R1", TransportMode::Tram), route("R2", TransportMode::Tram)];
    timetable.services = vec![service("MON", DaysOfWeek::of(&[chrono::Weekday::Mon]))];
    timetable.trips = vec![
        trip("R1-1", "R1", "MON", &[("A", "10:00"), ("B", "10:05"), ("C", "10:10")]),
        trip("R2-1", "R2", "MON", &[("C", "10:12"), ("D", "10:20")]),
    ];
    timetable
}

/// A tram stop A and a bus stop D about 550 metres apart with no
/// timetabled connection between them.
pub fn walkable_timetable() -> Timetable {
    let mut timetable = stations_only(vec![
        station("A", TransportMode::Tram, 53.4800, -2.2400),
        station("B", TransportMode::Tram, 53.5200, -2.2400),
        station("D", TransportMode::Bus, 53.4850, -2.2400),
    ]);
    timetable.routes = vec![route("R1", TransportMode::Tram)];
    timetable.services = vec![service("ALL", DaysOfWeek::ALL)];
    timetable.trips = vec![trip("R1-1", "R1", "ALL", &[("A", "10:00"), ("B", "10:05")])];
    timetable
}

/// Tram stop S close to composite C made of M1 (tram) and M2 (bus).
pub fn composite_timetable() -> Timetable {
    let mut m1 = station("M1", TransportMode::Tram, 53.4805, -2.2400);
    m1.composite = Some(CompositeId::new("C"));
    let mut m2 = station("M2", TransportMode::Bus, 53.4800, -2.2410);
    m2.composite = Some(CompositeId::new("C"));

    let mut timetable = stations_only(vec![
        station("S", TransportMode::Tram, 53.4800, -2.2400),
        m1,
        m2,
        station("F", TransportMode::Tram, 53.5200, -2.2400),
        station("G", TransportMode::Bus, 53.4400, -2.2400),
    ]);
    timetable.composites = vec![CompositeStation {
        id: CompositeId::new("C"),
        name: "Composite".into(),
        members: ["M1", "M2"].into_iter().map(StationId::from).collect(),
    }];
    timetable.routes = vec![
        route("T1", TransportMode::Tram),
        route("T2", TransportMode::Tram),
        route("B1", TransportMode::Bus),
    ];
    timetable.services = vec![service("ALL", DaysOfWeek::ALL)];
    timetable.trips = vec![
        trip("T1-1", "T1", "ALL", &[("S", "09:00"), ("F", "09:10")]),
        trip("T2-1", "T2", "ALL", &[("M1", "09:00"), ("F", "09:12")]),
        trip("B1-1", "B1", "ALL", &[("M2", "09:30"), ("G", "09:45")]),
    ];
    timetable
}

/// Route N runs A to B just after midnight at the end of Mondays, as
/// 24:10 and 24:20.
pub fn late_night_timetable() -> Timetable {
    let mut timetable = stations_only(vec![
        station("A", TransportMode::Tram, 53.40, -2.30),
        station("B", TransportMode::Tram, 53.42, -2.28),
    ]);
    timetable.routes = vec![route("N", TransportMode::Tram)];
    timetable.services = vec![service("MON", DaysOfWeek::of(&[chrono::Weekday::Mon]))];
    timetable.trips = vec![trip("N-1", "N", "MON", &[("A", "24:10"), ("B", "24:20")])];
    timetable
}
