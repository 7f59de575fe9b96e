use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = sac_api::Args::parse();

	sac_api::run(args).await
}
