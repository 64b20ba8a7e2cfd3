use anyhow::{bail, Context, Result};
use zip_driver::{ControllerActor, ControllerEvent, ControllerOptions};
use zip_logging::loggers::console::ConsoleLogger;
use zip_logging::{Logger, Loglevel};
use zip_udp::binding::{UdpBinding, UdpBindingConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(gateway) = args.next() else {
        bail!("usage: cli <gateway-ip> [local-port]");
    };
    let gateway_ip = gateway
        .parse()
        .with_context(|| format!("invalid gateway address {gateway}"))?;

    let builder = UdpBindingConfig::builder().gateway_ip(gateway_ip);
    let config = match args.next() {
        Some(port) => builder
            .local_port(port.parse().context("invalid local port")?)
            .build(),
        None => builder.build(),
    };

    let binding = UdpBinding::open(config)
        .await
        .context("failed to open the gateway socket")?;

    let (controller, actor, mut adapter) = ControllerActor::new(binding, ControllerOptions::default());
    tokio::spawn(actor.run());

    // Drain the actor's log queue into the terminal
    tokio::spawn(async move {
        let mut console = ConsoleLogger::new(Loglevel::Debug);
        while let Some((log, level)) = adapter.logs.recv().await {
            console.log(log, level);
        }
    });

    let node_list = controller.get_node_list().await?;
    println!("nodes in the network:");
    for node in &node_list.node_list {
        println!("  node {}", node);
    }

    // Print everything the gateway pushes until Ctrl-C
    let mut events = controller.subscribe();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Ok(ControllerEvent::Unsolicited(packet)) => {
                    println!("unsolicited: {:?}", packet.command);
                }
                Ok(ControllerEvent::ModeChanged(mode)) => {
                    println!("network mode: {}", mode);
                }
                Err(_) => break,
            },
        }
    }

    controller.shutdown().await.ok();
    Ok(())
}
