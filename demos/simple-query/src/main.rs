use anyhow::{Context, Result};
use structopt::StructOpt;

use whois_chain::{Lookup, Resolver};

#[derive(Debug, StructOpt)]
#[structopt(name = "simple-query", about = "Look up a domain and follow WHOIS referrals")]
struct Opt {
    /// Domain to look up
    domain: String,

    /// Start at this server instead of asking IANA
    #[structopt(short, long)]
    server: Option<String>,

    /// Keep full verisign responses
    #[structopt(long)]
    never_cut: bool,

    /// Send the domain as typed instead of its ACE form
    #[structopt(long)]
    no_rfc3490: bool,

    /// TCP port of the WHOIS servers
    #[structopt(short, long, default_value = "43")]
    port: u16,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opt = Opt::from_args();

    let mut lookup = Lookup::new().never_cut(opt.never_cut).rfc3490(!opt.no_rfc3490);
    if let Some(server) = &opt.server {
        lookup = lookup.server(server.as_str());
    }

    let chain = Resolver::new()
        .with_port(opt.port)
        .resolve(&opt.domain, &lookup)
        .with_context(|| format!("WHOIS lookup for {} failed", opt.domain))?;

    log::info!("Queried {}", chain.servers.join(" -> "));

    // Oldest response first, in the order the servers were asked.
    for (server, response) in chain.servers.iter().zip(chain.responses.iter().rev()) {
        println!("# {}\n", server);
        println!("{}", response);
    }

    Ok(())
}
