//! User lookup, search, suggestion, and contributor endpoints.

// self
use crate::{
	_prelude::*,
	api::{ApiVersion, Category, ImageSize, ProfileImage, ResponseList, Twitter, User, UserRef},
	error::ConfigError,
	http::{ApiFuture, ApiHttpClient, ApiRequest, HttpParameter},
	obs::Operation,
};

/// Upper bound on identifiers accepted by a single `users/lookup` call.
pub const LOOKUP_LIMIT: usize = 100;
/// Fixed page size used by `users/search`.
pub const SEARCH_PAGE_SIZE: u32 = 20;

/// Remote user endpoints.
///
/// Every method issues exactly one signed request. Identifier overloads are folded into
/// [`UserRef`], so `show_user(42.into())` and `show_user("jack".into())` hit the same endpoint
/// with `user_id` or `screen_name` respectively.
pub trait UserMethods
where
	Self: Send + Sync,
{
	/// Extended information for one user (`1.1/users/show.json`).
	fn show_user(&self, user: UserRef) -> ApiFuture<'_, User>;

	/// Extended information for one user from the legacy `1/users/show.json` endpoint.
	fn show_user_v1(&self, user: UserRef) -> ApiFuture<'_, User>;

	/// Up to 100 users by screen name (`1.1/users/lookup.json`).
	fn lookup_users_by_screen_name<'a>(
		&'a self,
		screen_names: &'a [&'a str],
	) -> ApiFuture<'a, ResponseList<User>>;

	/// Up to 100 users by numeric id (`1.1/users/lookup.json`).
	fn lookup_users_by_id<'a>(&'a self, ids: &'a [u64]) -> ApiFuture<'a, ResponseList<User>>;

	/// People search; pages start at 1 and hold 20 users each (`1.1/users/search.json`).
	///
	/// Only the first 1000 matches are reachable.
	fn search_users<'a>(&'a self, query: &'a str, page: u32)
	-> ApiFuture<'a, ResponseList<User>>;

	/// Suggested user categories (`1.1/users/suggestions.json`).
	fn suggested_user_categories(&self) -> ApiFuture<'_, ResponseList<Category>>;

	/// Users in a suggestion category (`1.1/users/suggestions/:slug.json`).
	///
	/// Clients should cache this data for no more than one hour.
	fn user_suggestions<'a>(&'a self, category_slug: &'a str)
	-> ApiFuture<'a, ResponseList<User>>;

	/// Users in a suggestion category with their latest status
	/// (`1.1/users/suggestions/:slug/members.json`).
	fn member_suggestions<'a>(
		&'a self,
		category_slug: &'a str,
	) -> ApiFuture<'a, ResponseList<User>>;

	/// Resolves a profile image URL from the endpoint's redirect
	/// (`1/users/profile_image/:screen_name.json`).
	fn profile_image<'a>(
		&'a self,
		screen_name: &'a str,
		size: ImageSize,
	) -> ApiFuture<'a, ProfileImage>;

	/// Users who can contribute to the given account (`1.1/users/contributors.json`).
	fn contributors(&self, user: UserRef) -> ApiFuture<'_, ResponseList<User>>;

	/// Accounts the given user can contribute to (`1.1/users/contributees.json`).
	fn contributees(&self, user: UserRef) -> ApiFuture<'_, ResponseList<User>>;
}

#[derive(Deserialize)]
struct SuggestionPayload {
	users: Vec<User>,
}

impl<C> UserMethods for Twitter<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn show_user(&self, user: UserRef) -> ApiFuture<'_, User> {
		Box::pin(self.show(ApiVersion::V1_1, Operation::ShowUser, user))
	}

	fn show_user_v1(&self, user: UserRef) -> ApiFuture<'_, User> {
		Box::pin(self.show(ApiVersion::V1, Operation::ShowUserV1, user))
	}

	fn lookup_users_by_screen_name<'a>(
		&'a self,
		screen_names: &'a [&'a str],
	) -> ApiFuture<'a, ResponseList<User>> {
		Box::pin(async move {
			if screen_names.iter().any(|name| name.trim().is_empty()) {
				return Err(ConfigError::invalid_argument("screen names must not be empty").into());
			}

			let joined = screen_names
				.iter()
				.map(|name| name.trim_start_matches('@'))
				.collect::<Vec<_>>()
				.join(",");

			self.lookup(screen_names.len(), HttpParameter::text("screen_name", joined)).await
		})
	}

	fn lookup_users_by_id<'a>(&'a self, ids: &'a [u64]) -> ApiFuture<'a, ResponseList<User>> {
		Box::pin(async move {
			let joined = ids.iter().map(u64::to_string).collect::<Vec<_>>().join(",");

			self.lookup(ids.len(), HttpParameter::text("user_id", joined)).await
		})
	}

	fn search_users<'a>(
		&'a self,
		query: &'a str,
		page: u32,
	) -> ApiFuture<'a, ResponseList<User>> {
		Box::pin(async move {
			if page == 0 {
				return Err(ConfigError::invalid_argument("search pages start at 1").into());
			}

			let url = self.endpoint(ApiVersion::V1_1, "users/search.json")?;
			let request = ApiRequest::get(url)
				.with_parameter(HttpParameter::text("q", query))
				.with_parameter(HttpParameter::text("per_page", SEARCH_PAGE_SIZE.to_string()))
				.with_parameter(HttpParameter::text("page", page.to_string()))
				.with_parameters(self.entities_parameter());

			self.list(Operation::SearchUsers, request).await
		})
	}

	fn suggested_user_categories(&self) -> ApiFuture<'_, ResponseList<Category>> {
		Box::pin(async move {
			let url = self.endpoint(ApiVersion::V1_1, "users/suggestions.json")?;

			self.list(Operation::SuggestedUserCategories, ApiRequest::get(url)).await
		})
	}

	fn user_suggestions<'a>(
		&'a self,
		category_slug: &'a str,
	) -> ApiFuture<'a, ResponseList<User>> {
		Box::pin(async move {
			let path = format!("users/suggestions/{}.json", Self::slug(category_slug)?);
			let url = self.endpoint(ApiVersion::V1_1, &path)?;
			let response = self.call(Operation::UserSuggestions, ApiRequest::get(url)).await?;
			let payload = response.json::<SuggestionPayload>()?;

			Ok(ResponseList::new(payload.users, response.rate_limit()))
		})
	}

	fn member_suggestions<'a>(
		&'a self,
		category_slug: &'a str,
	) -> ApiFuture<'a, ResponseList<User>> {
		Box::pin(async move {
			let path = format!("users/suggestions/{}/members.json", Self::slug(category_slug)?);
			let url = self.endpoint(ApiVersion::V1_1, &path)?;

			self.list(Operation::MemberSuggestions, ApiRequest::get(url)).await
		})
	}

	fn profile_image<'a>(
		&'a self,
		screen_name: &'a str,
		size: ImageSize,
	) -> ApiFuture<'a, ProfileImage> {
		Box::pin(async move {
			let screen_name = screen_name.trim_start_matches('@');

			if screen_name.is_empty() {
				return Err(ConfigError::invalid_argument("screen name must not be empty").into());
			}

			let path = format!("users/profile_image/{}.json", Self::segment(screen_name));
			let url = self.endpoint(ApiVersion::V1, &path)?;
			let request =
				ApiRequest::get(url).with_parameter(HttpParameter::text("size", size.as_str()));
			let response = self.call(Operation::ProfileImage, request).await?;

			Ok(ProfileImage { url: response.location()?, rate_limit: response.rate_limit() })
		})
	}

	fn contributors(&self, user: UserRef) -> ApiFuture<'_, ResponseList<User>> {
		Box::pin(self.contribution(Operation::Contributors, "users/contributors.json", user))
	}

	fn contributees(&self, user: UserRef) -> ApiFuture<'_, ResponseList<User>> {
		Box::pin(self.contribution(Operation::Contributees, "users/contributees.json", user))
	}
}

impl<C> Twitter<C>
where
	C: ?Sized + ApiHttpClient,
{
	async fn show(&self, version: ApiVersion, operation: Operation, user: UserRef) -> Result<User> {
		let url = self.endpoint(version, "users/show.json")?;
		let request = ApiRequest::get(url)
			.with_parameter(user.to_parameter())
			.with_parameters(self.entities_parameter());

		self.call(operation, request).await?.json()
	}

	async fn lookup(&self, count: usize, ids: HttpParameter) -> Result<ResponseList<User>> {
		if count == 0 || count > LOOKUP_LIMIT {
			return Err(ConfigError::invalid_argument(format!(
				"lookup accepts between 1 and {LOOKUP_LIMIT} users, got {count}"
			))
			.into());
		}

		let url = self.endpoint(ApiVersion::V1_1, "users/lookup.json")?;
		let request =
			ApiRequest::get(url).with_parameter(ids).with_parameters(self.entities_parameter());

		self.list(Operation::LookupUsers, request).await
	}

	async fn contribution(
		&self,
		operation: Operation,
		path: &'static str,
		user: UserRef,
	) -> Result<ResponseList<User>> {
		let url = self.endpoint(ApiVersion::V1_1, path)?;
		let request = ApiRequest::get(url)
			.with_parameter(user.to_parameter())
			.with_parameters(self.entities_parameter());

		self.list(operation, request).await
	}

	async fn list<T>(&self, operation: Operation, request: ApiRequest) -> Result<ResponseList<T>>
	where
		T: for<'de> Deserialize<'de>,
	{
		let response = self.call(operation, request).await?;

		Ok(ResponseList::new(response.json()?, response.rate_limit()))
	}

	fn slug(category_slug: &str) -> Result<String> {
		if category_slug.trim().is_empty() {
			return Err(ConfigError::invalid_argument("category slug must not be empty").into());
		}

		Ok(Self::segment(category_slug))
	}
}
