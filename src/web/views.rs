use askama::Template;
use askama_web::WebTemplate;

#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub(crate) struct IndexTemplate {
    pub(crate) default_topic: &'static str,
}

#[derive(Template, WebTemplate)]
#[template(path = "meme.html")]
pub(crate) struct MemeTemplate {
    pub(crate) caption: String,
    pub(crate) warnings: Vec<String>,
    pub(crate) image_b64: String,
    pub(crate) download_filename: &'static str,
}
