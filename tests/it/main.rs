use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use ecocalc::*;

/// Answers searches from a fixed gazetteer and counts the queries sent
#[derive(Default)]
struct Gazetteer {
    places: HashMap<&'static str, Vec<Location>>,
    sent: Mutex<Vec<String>>,
}

#[async_trait]
impl LocationResolver for Gazetteer {
    async fn fetch(&self, query: &str) -> Result<Vec<Location>, Error> {
        self.sent.lock().unwrap().push(query.to_string());
        Ok(self.places.get(query).cloned().unwrap_or_default())
    }
}

fn lisbon() -> Location {
    Location::new("Lisboa, Portugal", 38.7223, -9.1393)
}

fn porto() -> Location {
    Location::new("Porto, Portugal", 41.1579, -8.6291)
}

fn funchal() -> Location {
    Location::new("Funchal, Madeira, Portugal", 32.6669, -16.9241)
}

fn gazetteer() -> Gazetteer {
    Gazetteer {
        places: HashMap::from([
            ("Lisboa", vec![lisbon()]),
            ("Porto", vec![porto()]),
            ("Funchal", vec![funchal()]),
        ]),
        ..Default::default()
    }
}

enum Router {
    /// Every pair is `km` apart
    Fixed { km: f64 },
    /// There are no roads
    NoRoute,
    /// The router cannot be reached
    Down,
}

#[async_trait]
impl RouteResolver for Router {
    async fn fetch_route(&self, _: &Location, _: &Location) -> Result<Option<RouteData>, Error> {
        match self {
            Router::Fixed { km } => Ok(Some(RouteData {
                distance_meters: km * 1000.0,
                duration_seconds: km * 45.0,
                geometry: None,
            })),
            Router::NoRoute => Ok(None),
            Router::Down => Err(Error::Status {
                status: 502,
                body: "Bad Gateway".to_string(),
            }),
        }
    }
}

static KEY: &str = "eco_calc_history";

async fn select_trip(session: &mut Session<'_>) {
    session.search(Field::Origin, "Lisboa").await;
    assert!(session.select(Field::Origin, 0));
    session.search(Field::Destination, "Porto").await;
    assert!(session.select(Field::Destination, 0));
}

#[tokio::test]
async fn calculate_and_record() {
    let locations = gazetteer();
    let routes = Router::Fixed { km: 1000.0 };
    let storage = InMemory::default();
    let mut session = Session::start(&locations, &routes, &storage, KEY).await;
    select_trip(&mut session).await;
    session.set_passengers("2");

    let result = session.calculate().await.unwrap();

    assert_eq!(result.origin, lisbon());
    assert_eq!(result.destination, porto());
    assert_eq!(result.distance_km, 1000.0);
    assert_eq!(result.duration_min, 750.0);
    assert_eq!(result.passengers, 2);
    assert_eq!(result.emissions, calculate(1000.0, 2));
    assert!(result.timestamp > 0);

    assert_eq!(session.state().current.as_ref(), Some(&result));
    assert_eq!(session.state().history.first(), Some(&result));
    assert!(!session.state().loading);

    let persisted = history::load(&storage, KEY).await;
    assert_eq!(persisted, vec![result]);
}

#[tokio::test]
async fn missing_location_makes_no_request() {
    struct Unreachable;

    #[async_trait]
    impl RouteResolver for Unreachable {
        async fn fetch_route(&self, _: &Location, _: &Location) -> Result<Option<RouteData>, Error> {
            panic!("no route must be requested without both locations")
        }
    }

    let locations = gazetteer();
    let storage = InMemory::default();
    let mut session = Session::start(&locations, &Unreachable, &storage, KEY).await;
    session.search(Field::Origin, "Lisboa").await;
    session.select(Field::Origin, 0);

    let error = session.calculate().await.unwrap_err();
    assert!(matches!(error, CalculationError::MissingLocations));
    assert_eq!(session.state().error, Some(error.to_string()));
    assert!(session.state().history.is_empty());
    assert_eq!(storage.maybe_get(KEY).await.unwrap(), None);
}

#[tokio::test]
async fn no_route_is_not_stored() {
    let locations = gazetteer();
    let storage = InMemory::default();
    let mut session = Session::start(&locations, &Router::NoRoute, &storage, KEY).await;
    select_trip(&mut session).await;

    let error = session.calculate().await.unwrap_err();
    assert!(matches!(error, CalculationError::RouteUnavailable));
    assert_eq!(
        session.state().error.as_deref(),
        Some("Could not compute a ground route between these locations.")
    );
    assert!(session.state().current.is_none());
    assert!(!session.state().loading);
    assert_eq!(storage.maybe_get(KEY).await.unwrap(), None);
}

#[tokio::test]
async fn router_failure_asks_to_try_again() {
    let locations = gazetteer();
    let storage = InMemory::default();
    let mut session = Session::start(&locations, &Router::Down, &storage, KEY).await;
    select_trip(&mut session).await;

    let error = session.calculate().await.unwrap_err();
    assert!(matches!(error, CalculationError::Transient(Error::Status { status: 502, .. })));
    assert_eq!(
        session.state().error.as_deref(),
        Some("Error calculating the route. Please try again.")
    );
    assert!(session.state().history.is_empty());
    assert_eq!(Router::Down.route(&lisbon(), &porto()).await, None);
}

#[tokio::test]
async fn short_queries_are_not_sent() {
    let locations = gazetteer();
    let storage = InMemory::default();
    let mut session = Session::start(&locations, &Router::NoRoute, &storage, KEY).await;

    assert!(session.issue_search(Field::Origin, "Li").is_none());
    assert!(session.search(Field::Origin, "Li").await.is_empty());
    assert_eq!(session.search(Field::Origin, "Lisboa").await, &[lisbon()]);
    assert_eq!(*locations.sent.lock().unwrap(), vec!["Lisboa".to_string()]);
}

#[tokio::test]
async fn latest_search_wins() {
    let locations = gazetteer();
    let storage = InMemory::default();
    let mut session = Session::start(&locations, &Router::NoRoute, &storage, KEY).await;

    let first = session.issue_search(Field::Destination, "Porto").unwrap();
    let second = session.issue_search(Field::Destination, "Funchal").unwrap();
    let first_found = session.resolve(&first).await;
    let second_found = session.resolve(&second).await;

    // the older request completes last
    session.complete_search(second, second_found);
    session.complete_search(first, first_found);

    assert_eq!(session.state().destination.suggestions, vec![funchal()]);
    assert_eq!(session.state().destination.query, "Funchal");
}

#[tokio::test]
async fn history_keeps_ten_and_survives_restart() {
    let locations = gazetteer();
    let storage = InMemory::default();

    let routes = Router::Fixed { km: 300.0 };
    let mut timestamps = vec![];
    {
        let mut session = Session::start(&locations, &routes, &storage, KEY).await;
        select_trip(&mut session).await;
        for passengers in 1..=11 {
            session.set_passengers(&passengers.to_string());
            let result = session.calculate().await.unwrap();
            timestamps.push((result.passengers, result.timestamp));
        }
        assert_eq!(session.state().history.len(), HISTORY_CAPACITY);
    }

    let mut session = Session::start(&locations, &Router::Down, &storage, KEY).await;
    let passengers = session
        .state()
        .history
        .iter()
        .map(|entry| entry.passengers)
        .collect::<Vec<_>>();
    assert_eq!(passengers, (2..=11).rev().collect::<Vec<_>>());

    // restoring does not recompute, so the router being down does not matter
    let restored = session.restore(9).unwrap().clone();
    assert_eq!(restored.passengers, 2);
    assert_eq!(restored.timestamp, timestamps[1].1);
    assert_eq!(session.state().passengers, 2);
    assert_eq!(session.state().origin.selected, Some(lisbon()));
    assert_eq!(session.state().destination.query, "Porto, Portugal");
    assert!(session.restore(10).is_none());
}

#[tokio::test]
async fn malformed_history_is_discarded() {
    let locations = gazetteer();
    let storage = InMemory::default();
    storage.put(KEY, b"[{\"version\": 0}]".to_vec()).await.unwrap();

    let routes = Router::Fixed { km: 10.0 };
    let mut session = Session::start(&locations, &routes, &storage, KEY).await;
    assert!(session.state().history.is_empty());

    select_trip(&mut session).await;
    session.calculate().await.unwrap();
    assert_eq!(history::load(&storage, KEY).await.len(), 1);
}

#[tokio::test]
async fn history_on_disk() {
    let dir = std::env::temp_dir().join("ecocalc_it_history_on_disk");
    let _ = std::fs::remove_dir_all(&dir);
    let key = dir.join("eco_calc_history.json");
    let key = key.to_str().unwrap();
    let locations = gazetteer();
    let routes = Router::Fixed { km: 42.0 };

    let result = {
        let mut session = Session::start(&locations, &routes, &LocalDisk, key).await;
        select_trip(&mut session).await;
        session.calculate().await.unwrap()
    };

    let history = History::open(&LocalDisk, key).await;
    assert_eq!(history.entries(), &[result]);
    assert_eq!(history.load().await.len(), 1);

    std::fs::remove_dir_all(&dir).unwrap();
    assert!(!dir.exists());
}

/// Verifies the public services still answer in the shape we parse.
#[tokio::test]
#[ignore = "reaches nominatim.openstreetmap.org and router.project-osrm.org"]
async fn acceptance_lisbon_porto() {
    let config = Config::default();
    let locations = Nominatim::new(&config).unwrap();
    let routes = Osrm::new(&config).unwrap();
    let storage = InMemory::default();
    let mut session = Session::start(&locations, &routes, &storage, KEY).await;
    select_trip(&mut session).await;

    let result = session.calculate().await.unwrap();
    // ~313 km by road
    assert!(result.distance_km > 280.0 && result.distance_km < 350.0);
    assert_eq!(result.emissions[0].mode, TransportMode::Train);
}
