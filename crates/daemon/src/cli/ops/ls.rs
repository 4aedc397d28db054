use clap::Args;

use docstore_daemon::http_server::api::client::ApiError;
use docstore_daemon::http_server::api::docs::list::LsRequest;

#[derive(Args, Debug, Clone)]
pub struct Ls {
    #[command(flatten)]
    pub request: LsRequest,
}

#[derive(Debug, thiserror::Error)]
pub enum LsError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Ls {
    type Error = LsError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let response = ctx.client.call(self.request.clone()).await?;
        let docs = response.data.docs;

        if docs.is_empty() {
            return Ok("no documents".to_string());
        }

        let lines: Vec<String> = docs
            .iter()
            .map(|doc| {
                let visibility = if doc.public { "public" } else { "private" };
                let shared = if doc.grant.is_empty() {
                    String::new()
                } else {
                    format!("  shared with {}", doc.grant.join(", "))
                };
                format!(
                    "{}  {}  {:<24}  {:<8}  {}{}",
                    doc.id, doc.created, doc.name, visibility, doc.mime, shared
                )
            })
            .collect();

        Ok(lines.join("\n"))
    }
}
