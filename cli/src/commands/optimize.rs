use anyhow::Context;
use tracing::info;

use mtune_common::cancel::CancelToken;
use mtune_common::network::detect;
use mtune_common::system::LinkRepository;
use mtune_core::engine::MtuOptimizer;
use mtune_core::link::OsLinkRepo;
use mtune_core::probe::PingProber;

use crate::commands::CommandLine;
use crate::terminal::print;

/// One full optimization run: resolve the interface, read its MTU, hand off
/// to the engine, report the outcome.
pub async fn run(cli: CommandLine, cancel: CancelToken) -> anyhow::Result<()> {
    let cfg = cli.to_config();
    cfg.validate()?;

    // Reject a bad custom value before touching the host at all.
    if let Some(custom) = cli.custom {
        anyhow::ensure!(
            (cfg.min_mtu..=cfg.max_mtu).contains(&custom),
            "invalid MTU value: {custom} (must be {}-{})",
            cfg.min_mtu,
            cfg.max_mtu
        );
    }

    let link = OsLinkRepo;

    let iface = match &cli.iface {
        Some(name) => name.clone(),
        None => {
            print::status("Scanning for VPN interface...");
            let interfaces = link.interfaces();
            detect::detect_vpn_interface(&interfaces)
                .map(|interface| interface.name.clone())
                .context("no VPN interface detected")?
        }
    };
    print::status(format!("Using interface: {iface}"));

    let current = link
        .read_mtu(&iface)
        .await
        .with_context(|| format!("could not retrieve MTU for {iface}"))?;
    print::status(format!("Current MTU: {current}"));

    let prober = PingProber::new(&cfg);
    let optimizer = MtuOptimizer::new(Box::new(link), Box::new(prober), cfg, cancel);

    let applied = match cli.custom {
        Some(custom) => {
            info!("Setting custom MTU: {custom}");
            optimizer.apply_custom(&iface, custom).await?
        }
        None => optimizer.search(&iface, current).await?,
    };

    print::success(format!("{iface} is now running with MTU {applied}"));
    Ok(())
}
