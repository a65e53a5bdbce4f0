use flow_diorama::ViewerConfig;

fn main() -> anyhow::Result<()> {
    flow_diorama::run(ViewerConfig::default().with_title("Café"))
}
