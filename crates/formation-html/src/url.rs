/// Host-side URL generation consumed by the HTML and form builders.
///
/// Implementations come from the embedding application; the builders only
/// need path, route, and action resolution plus the asset root. Absolute
/// URLs are expected to pass through `to_path` unchanged.
pub trait UrlResolver {
    /// Resolves an application path, optionally forcing the scheme.
    fn to_path(&self, path: &str, params: &[String], secure: Option<bool>) -> String;

    /// Resolves a named route.
    fn to_route(&self, name: &str, params: &[String]) -> String;

    /// Resolves a controller-action reference.
    fn to_action(&self, action: &str, params: &[String]) -> String;

    /// Resolves an asset path against the asset root.
    fn asset_url(&self, path: &str, secure: Option<bool>) -> String;

    /// URL of the request being rendered.
    fn current_url(&self) -> String;

    /// URL of the previous request.
    fn previous_url(&self) -> String;
}
