//! Looks up a user, a batch of users, and a profile image against a local mock of the REST API
//! using the default reqwest transport built by [`HttpClientFactory`].
//!
//! [`HttpClientFactory`]: twitter_rest::http::HttpClientFactory

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use twitter_rest::{
	Twitter, UserMethods,
	api::{ImageSize, UserRef},
	auth::OAuthCredentials,
	conf::Configuration,
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let show_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/1.1/users/show.json").query_param("screen_name", "jack");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"id":12,"screen_name":"jack","name":"jack","followers_count":6000000}"#);
		})
		.await;
	let lookup_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/1.1/users/lookup.json").query_param("user_id", "12,13");
			then.status(200)
				.header("content-type", "application/json")
				.header("x-rate-limit-limit", "180")
				.header("x-rate-limit-remaining", "179")
				.body(r#"[{"id":12,"screen_name":"jack"},{"id":13,"screen_name":"biz"}]"#);
		})
		.await;
	let image_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/1/users/profile_image/jack.json");
			then.status(302).header("location", "https://pbs.example.com/jack_bigger.png");
		})
		.await;
	let conf = Configuration::builder()
		.rest_base_url(Url::parse(&server.base_url())?)
		.user_agent("twitter-rest-demo/0.1")
		.build()?;
	let credentials = OAuthCredentials::new("demo-consumer-key", "demo-consumer-secret")
		.with_access_token("demo-access-token", "demo-access-secret");
	let twitter = Twitter::new(conf, credentials)?;
	let jack = twitter.show_user(UserRef::from("jack")).await?;

	println!("@{} has {} followers.", jack.screen_name, jack.followers_count);

	let users = twitter.lookup_users_by_id(&[12, 13]).await?;

	for user in users.iter() {
		println!("Looked up @{} ({}).", user.screen_name, user.id);
	}
	if let Some(limit) = &users.rate_limit {
		println!("Lookup window: {}/{} calls left.", limit.remaining, limit.limit);
	}

	let image = twitter.profile_image("jack", ImageSize::Bigger).await?;

	println!("Profile image lives at {}.", image.url);

	show_mock.assert_async().await;
	lookup_mock.assert_async().await;
	image_mock.assert_async().await;

	Ok(())
}
