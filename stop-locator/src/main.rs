use std::net::SocketAddr;

use stop_locator::cache::{CacheConfig, CachedGeocoder};
use stop_locator::domain::BoundingBox;
use stop_locator::geocoder::{
    Geocoder, GeocoderConfig, GoogleGeocoder, LocationResolver, ServiceRegion, StaticGeocoder,
};
use stop_locator::locate::StopLocator;
use stop_locator::search::SearchConfig;
use stop_locator::store::MemoryStore;
use stop_locator::web::{AppState, create_router};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default listen address.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Default path of the stop data file.
const DEFAULT_STOPS_PATH: &str = "data/stops.json";

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stop_locator=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Service region, Dublin unless overridden
    let region = match std::env::var("SERVICE_REGION") {
        Ok(bounds) => {
            let bounds = BoundingBox::parse(&bounds).expect("Invalid SERVICE_REGION");
            ServiceRegion::new(bounds, ServiceRegion::default().region_hint)
        }
        Err(_) => ServiceRegion::default(),
    };
    info!(
        southwest = %region.bounds.southwest,
        northeast = %region.bounds.northeast,
        hint = %region.region_hint,
        "service region"
    );

    // Load stops (fail fast if unavailable)
    let search_config = SearchConfig::default();
    let stops_path =
        std::env::var("STOPS_PATH").unwrap_or_else(|_| DEFAULT_STOPS_PATH.to_string());
    let store = MemoryStore::new();
    let count = store
        .load_json_file(&search_config.collection, &stops_path)
        .await
        .expect("Failed to load stops");
    info!(count, path = %stops_path, "loaded stops");

    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()
        .expect("Invalid BIND_ADDR");

    // A fixture file replaces the live provider for offline development
    if let Ok(fixture) = std::env::var("GEOCODER_FIXTURE") {
        let geocoder = StaticGeocoder::from_json_file(&fixture).expect("Failed to load fixture");
        info!(path = %fixture, "using static geocoder");
        serve(geocoder, region, store, search_config, addr).await;
        return;
    }

    let api_key = std::env::var("MAPS_API_KEY").unwrap_or_else(|_| {
        warn!("MAPS_API_KEY not set, geocoding requests will be denied");
        String::new()
    });
    let geocoder =
        GoogleGeocoder::new(GeocoderConfig::new(api_key)).expect("Failed to create geocoder");
    let geocoder = CachedGeocoder::new(geocoder, &CacheConfig::default());

    serve(geocoder, region, store, search_config, addr).await;
}

async fn serve<G: Geocoder + 'static>(
    geocoder: G,
    region: ServiceRegion,
    store: MemoryStore,
    config: SearchConfig,
    addr: SocketAddr,
) {
    let locator = StopLocator::new(LocationResolver::new(geocoder, region), store, config);
    let app = create_router(AppState::new(locator));

    info!(%addr, "stop locator listening");
    info!("  GET /health                      - Health check");
    info!("  GET /stops/nearby?q=             - Stops near a place or lat,lng");
    info!("  GET /stops/nearby/:lat,lng       - Stops near a position");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");
    axum::serve(listener, app).await.expect("Server error");
}
