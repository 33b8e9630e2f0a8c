/// Clean HTML content using the ammonia library.
///
/// Whitelist-based: safe tags (like <b>, <p>) are kept, dangerous tags
/// (like <script>, <iframe>) are removed together with their content, and
/// event-handler attributes are stripped. Applied to user-written feedback
/// comments before they are stored.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
