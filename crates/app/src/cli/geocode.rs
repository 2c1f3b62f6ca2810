use clap::Args;
use freight_app::geocoding::{
    DEFAULT_GEOCODING_BASE_URL, Geocoder, GeocodingClient, GeocodingConfig,
};

#[derive(Debug, Args)]
pub(crate) struct GeocodeArgs {
    /// Free-text address
    address: String,

    /// Provider host
    #[arg(long, env = "GEOCODING_BASE_URL", default_value = DEFAULT_GEOCODING_BASE_URL)]
    base_url: String,

    /// Provider key
    #[arg(long, env = "GEOCODING_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

pub(crate) async fn run(args: GeocodeArgs) -> Result<(), String> {
    let client = GeocodingClient::new(GeocodingConfig {
        base_url: args.base_url,
        api_key: args.api_key,
        ..GeocodingConfig::default()
    });

    let place = client
        .geocode(&args.address)
        .await
        .map_err(|error| format!("geocoding failed: {error}"))?;

    let Some(place) = place else {
        println!("no match for {:?}", args.address);
        return Ok(());
    };

    if let Some(formatted) = &place.formatted_address {
        println!("address: {formatted}");
    }
    println!("lat: {}", place.coordinates.lat());
    println!("lng: {}", place.coordinates.lng());
    println!("province: {}", place.province.as_deref().unwrap_or("-"));
    println!("city: {}", place.city.as_deref().unwrap_or("-"));

    Ok(())
}
