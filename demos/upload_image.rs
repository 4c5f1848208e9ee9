//! Uploads an in-memory image through an OAuth Echo media host using a custom transport.
//!
//! 1. Implement [`ApiHttpClient`] so requests can be inspected instead of sent.
//! 2. Select the media host and extra upload fields through [`Configuration`].
//! 3. Ask the client's [`ImageUploadFactory`] for an uploader and call `upload`.
//!
//! [`ImageUploadFactory`]: twitter_rest::media::ImageUploadFactory

// crates.io
use color_eyre::Result;
// self
use twitter_rest::{
	Twitter,
	auth::{OAuthAuthorization, OAuthCredentials},
	conf::Configuration,
	http::{ApiFuture, ApiHttpClient, ApiRequest, ApiResponse},
	media::{MediaProvider, MediaSource},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let conf = Configuration::builder()
		.media_provider(MediaProvider::Imgly)
		.media_provider_parameter("source", "twitter-rest-demo")
		.build()?;
	let credentials = OAuthCredentials::new("demo-consumer-key", "demo-consumer-secret")
		.with_access_token("demo-access-token", "demo-access-secret");
	let twitter: Twitter<PrintingHttpClient> =
		Twitter::with_http_client(conf, OAuthAuthorization::new(credentials), PrintingHttpClient);
	let uploader = twitter.image_upload_factory().uploader()?;
	let image = MediaSource::stream("pixel.png", b"\x89PNG\r\n\x1a\n".to_vec());
	let url = uploader.upload(image, Some("Hello from the demo")).await?;

	println!("Media host published the image at {url}.");

	let missing_key = twitter.image_upload_factory().uploader_for(MediaProvider::Twitpic);

	if let Err(e) = missing_key {
		println!("Twitpic needs an API key: {e}");
	}

	Ok(())
}

/// Prints the outgoing request and answers like img.ly would.
struct PrintingHttpClient;
impl ApiHttpClient for PrintingHttpClient {
	fn execute(&self, request: ApiRequest) -> ApiFuture<'_, ApiResponse> {
		Box::pin(async move {
			println!("{} {}", request.method, request.url);

			for (name, value) in &request.headers {
				println!("  {name}: {value}");
			}
			for parameter in &request.parameters {
				println!("  field {parameter:?}");
			}

			Ok(ApiResponse::new(200, r#"{"id":"demo","url":"https://img.ly/demo"}"#))
		})
	}
}
