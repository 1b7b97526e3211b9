use std::process;

use clap::{App, Arg, ArgMatches};

use acceptor::conf::AcceptorConf;
use pacc::setup::init_logger;
use pacc::{Server, ServerError};

fn main() {
    let matches = App::new("pacc")
        .version("0.1.0")
        .author("openacid")
        .about("paxos acceptor")
        .arg(
            Arg::with_name("conf")
                .long("conf")
                .takes_value(true)
                .required(true)
                .help("acceptor config in yaml"),
        )
        .arg(
            Arg::with_name("id")
                .long("id")
                .takes_value(true)
                .help("acceptor id, overrides acceptor_id in the config"),
        )
        .arg(
            Arg::with_name("recover")
                .long("recover")
                .help("recover from the existing storage instead of starting empty"),
        )
        .get_matches();

    if let Err(e) = run(&matches) {
        eprintln!("pacc: {}", e);
        process::exit(1);
    }
}

fn load_conf(matches: &ArgMatches) -> Result<AcceptorConf, ServerError> {
    let conffn = matches
        .value_of("conf")
        .ok_or_else(|| ServerError::BadArg("--conf is required".into()))?;

    let acceptor_id = match matches.value_of("id") {
        Some(id) => Some(
            id.parse()
                .map_err(|_| ServerError::BadArg(format!("--id: {}", id)))?,
        ),
        None => None,
    };

    let mut conf = AcceptorConf::from_file(conffn)?;
    conf.override_with(acceptor_id, matches.is_present("recover"));

    conf.check()?;
    Ok(conf)
}

fn run(matches: &ArgMatches) -> Result<(), ServerError> {
    let conf = load_conf(matches)?;

    init_logger(&conf.log, conf.acceptor_id)?;

    let mut rt = tokio::runtime::Builder::new()
        .basic_scheduler()
        .enable_all()
        .build()?;

    rt.block_on(async move {
        let server = Server::new(conf)?;
        server
            .serve_with_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await
    })
}
