use anyhow::Context;
use clap::Parser;
use mcp_for_azure_devops_work_items::azure::client::AzureDevOpsClient;
use mcp_for_azure_devops_work_items::config::Settings;
use mcp_for_azure_devops_work_items::mcp::context::ToolContext;
use mcp_for_azure_devops_work_items::mcp::server::AzureMcpServer;
use mcp_for_azure_devops_work_items::mcp::tools;
use mcp_for_azure_devops_work_items::server::http;
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Run in server mode (streamable HTTP instead of stdio)
    #[arg(long)]
    server: bool,

    /// Port to run the server on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();
    let args = Args::parse();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("{}", err);
            return Err(err.into());
        }
    };
    log::info!(
        "Using organization {} and project {}",
        settings.organization,
        settings.project
    );

    let client = AzureDevOpsClient::new(&settings).context("Failed to build HTTP client")?;
    let context = ToolContext::new(Arc::new(settings), Arc::new(client));
    let mcp_server = AzureMcpServer::new(context, tools::registry());

    if args.server {
        log::info!("Starting web server on port {}", args.port);
        http::run_server(mcp_server, args.port).await?;
    } else {
        log::info!("Starting stdio server");
        let service = mcp_server.serve(stdio()).await?;
        service.waiting().await?;
    }

    Ok(())
}
