// std
use std::fs;
// crates.io
use httpmock::prelude::*;
// self
use twitter_rest::{
	_preludet::*,
	Twitter,
	auth::{OAuthCredentials, Secret},
	conf::Configuration,
	error::ConfigError,
	http::ReqwestHttpClient,
	media::{MediaProvider, MediaSource, UploadContext},
};

fn png() -> MediaSource {
	MediaSource::stream("kitten.png", b"\x89PNG\r\n\x1a\nfake".to_vec())
}

fn twitter_with(conf: Configuration, credentials: OAuthCredentials) -> Twitter<ReqwestHttpClient> {
	Twitter::with_http_client(conf, test_authorization(credentials), test_reqwest_http_client())
}

fn echo_configuration(server: &MockServer, provider: MediaProvider) -> Configuration {
	let mut conf = test_configuration(&server.base_url());

	conf.media_provider = provider;
	conf.media_provider_upload_url =
		Some(Url::parse(&server.url("/api/2/upload.json")).expect("Upload URL should parse."));

	conf
}

fn expected_echo_header(conf: &Configuration) -> String {
	UploadContext::new(
		Arc::new(conf.clone()),
		Arc::new(test_authorization(test_credentials())),
		None,
	)
	.verify_credentials_authorization_header(&conf.verify_credentials_json_url)
	.expect("Echo header should be produced.")
}

#[tokio::test]
async fn twitter_upload_posts_signed_multipart_and_reads_media_url() {
	let server = MockServer::start_async().await;
	let twitter = build_test_twitter(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/1.1/statuses/update_with_media.json")
				.header_exists("authorization")
				.body_includes("name=\"status\"")
				.body_includes("hello world")
				.body_includes("name=\"media[]\"; filename=\"kitten.png\"");
			then.status(200).header("content-type", "application/json").body(
				r#"{"id":1,"entities":{"media":[{"media_url_https":"https://pbs.example.com/media/kitten.png"}]}}"#,
			);
		})
		.await;
	let uploader =
		twitter.image_upload_factory().uploader().expect("Default uploader should build.");
	let url = uploader.upload(png(), Some("hello world")).await.expect("Upload should succeed.");

	mock.assert_async().await;

	assert_eq!(url, "https://pbs.example.com/media/kitten.png");
}

#[tokio::test]
async fn twitpic_upload_sends_echo_headers_key_and_extra_fields() {
	let server = MockServer::start_async().await;
	let mut conf = echo_configuration(&server, MediaProvider::Twitpic);

	conf.media_provider_api_key = Some(Secret::new("twitpic-key"));
	conf.media_provider_parameters = vec![("source".into(), "demo".into())];

	let verify_url = conf.verify_credentials_json_url.to_string();
	let echo_header = expected_echo_header(&conf);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/2/upload.json")
				.header("x-auth-service-provider", verify_url.as_str())
				.header("x-verify-credentials-authorization", echo_header.as_str())
				.body_includes("name=\"key\"")
				.body_includes("twitpic-key")
				.body_includes("name=\"message\"")
				.body_includes("name=\"source\"")
				.body_includes("name=\"media\"; filename=\"kitten.png\"");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"id":"1lnphm","url":"https://twitpic.example.com/1lnphm"}"#);
		})
		.await;
	let twitter = twitter_with(conf, test_credentials());
	let url = twitter
		.image_upload_factory()
		.uploader()
		.expect("Twitpic uploader should build.")
		.upload(png(), Some("caption"))
		.await
		.expect("Upload should succeed.");

	mock.assert_async().await;

	assert_eq!(url, "https://twitpic.example.com/1lnphm");
}

#[tokio::test]
async fn imgly_upload_reads_file_from_disk() {
	let server = MockServer::start_async().await;
	let conf = echo_configuration(&server, MediaProvider::Imgly);
	let path = std::env::temp_dir().join(format!("twitter-rest-imgly-{}.jpg", std::process::id()));

	fs::write(&path, b"\xff\xd8\xff\xe0fake-jpeg").expect("Temporary image should be written.");

	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/2/upload.json")
				.header_exists("x-verify-credentials-authorization")
				.body_includes("fake-jpeg")
				.body_includes("image/jpeg");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"url":"https://img.example.com/abc"}"#);
		})
		.await;
	let twitter = twitter_with(conf, test_credentials());
	let result = twitter
		.image_upload_factory()
		.uploader()
		.expect("img.ly uploader should build.")
		.upload(MediaSource::File(path.clone()), None)
		.await;
	let _ = fs::remove_file(&path);

	mock.assert_async().await;

	assert_eq!(result.expect("Upload should succeed."), "https://img.example.com/abc");
}

#[tokio::test]
async fn missing_file_fails_before_sending() {
	let server = MockServer::start_async().await;
	let conf = echo_configuration(&server, MediaProvider::Imgly);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/2/upload.json");
			then.status(200).body(r#"{"url":"https://img.example.com/never"}"#);
		})
		.await;
	let twitter = twitter_with(conf, test_credentials());
	let err = twitter
		.image_upload_factory()
		.uploader()
		.expect("img.ly uploader should build.")
		.upload(MediaSource::File("/definitely/not/here.png".into()), None)
		.await
		.expect_err("A missing file should fail.");

	mock.assert_calls_async(0).await;

	assert!(matches!(err, Error::Transport(_)));
}

#[tokio::test]
async fn echo_upload_without_access_token_is_rejected_locally() {
	let server = MockServer::start_async().await;
	let conf = echo_configuration(&server, MediaProvider::Imgly);
	let twitter = twitter_with(conf, OAuthCredentials::new("consumer-key", "consumer-secret"));
	let err = twitter
		.image_upload_factory()
		.uploader()
		.expect("img.ly uploader should build.")
		.upload(png(), None)
		.await
		.expect_err("Echo uploads need an access token.");

	assert!(matches!(err, Error::Config(ConfigError::MissingAccessToken)));
}

#[tokio::test]
async fn twitpic_without_api_key_is_rejected_by_the_factory() {
	let server = MockServer::start_async().await;
	let twitter =
		twitter_with(echo_configuration(&server, MediaProvider::Twitpic), test_credentials());
	let err = twitter
		.image_upload_factory()
		.uploader()
		.err()
		.expect("Missing API key should be reported.");

	assert!(matches!(err, Error::Config(ConfigError::MissingApiKey { provider: "twitpic" })));
}

#[tokio::test]
async fn host_errors_map_into_api_errors() {
	let server = MockServer::start_async().await;
	let conf = echo_configuration(&server, MediaProvider::Imgly);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/2/upload.json");
			then.status(401)
				.header("content-type", "application/json")
				.body(r#"{"errors":[{"code":401,"message":"Could not authenticate you."}]}"#);
		})
		.await;
	let twitter = twitter_with(conf, test_credentials());
	let err = twitter
		.image_upload_factory()
		.uploader()
		.expect("img.ly uploader should build.")
		.upload(png(), Some("nope"))
		.await
		.expect_err("Unauthorized upload should fail.");

	mock.assert_async().await;

	assert_eq!(err.status(), Some(401));
	assert!(err.to_string().contains("Could not authenticate you."));
}
