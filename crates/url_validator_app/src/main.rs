fn main() -> anyhow::Result<()> {
    url_validator_app::run_app()
}
