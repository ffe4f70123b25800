use log::*;
use simplelog::{ColorChoice, Config as LogConfig, TermLogger, TerminalMode};

use bangbot::irc::{Message, TcpConn};
use bangbot::{util, Bot, Config, HandlerResult};

use std::path::PathBuf;

fn main() {
    TermLogger::init(
        util::get_log_level("BANGBOT_LOG"),
        LogConfig::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .expect("initialize logger");

    let file = match std::env::args().nth(1).map(PathBuf::from) {
        Some(file) => file,
        None => match Config::default_path() {
            Some(file) => file,
            None => {
                error!("cannot find a config directory, pass a config file instead");
                std::process::exit(1)
            }
        },
    };

    if !file.exists() {
        warn!("creating default config at {}", file.display());
        warn!("edit and re-run");
        if let Some(dir) = file.parent() {
            if let Err(err) = std::fs::create_dir_all(dir) {
                error!("cannot create {}: {}", dir.display(), err);
                std::process::exit(1)
            }
        }
        if let Err(err) = Config::default().save(&file) {
            error!("{}", err);
        }
        std::process::exit(1)
    }

    let config = match Config::load(&file) {
        Ok(config) => config,
        Err(err) => {
            error!("{}: {}", file.display(), err);
            std::process::exit(1)
        }
    };

    let address = config.address();
    info!("trying to connect to {}", address);
    let conn = match TcpConn::connect(&address) {
        Ok(conn) => conn,
        Err(err) => {
            error!("{}", err);
            std::process::exit(1)
        }
    };

    let mut bot = Bot::new(conn, config);
    if let Err(err) = builtin(&mut bot) {
        error!("{}", err);
        std::process::exit(1)
    }

    info!("connected and running");
    if let Err(err) = bot.run() {
        error!("{}", err);
        std::process::exit(1)
    }
}

fn builtin(bot: &mut Bot<TcpConn>) -> Result<(), bangbot::RegistryError> {
    bot.on_command("hello", hello_command)?
        .on_command("version", version_command)?;

    let mut names = bot
        .commands()
        .names()
        .iter()
        .map(|name| name.to_string())
        .collect::<Vec<_>>();
    names.push("commands".into());
    names.sort();

    let list = names
        .iter()
        .map(|name| format!("{}{}", bot.config().bang, name))
        .collect::<Vec<_>>()
        .join(" ");
    bot.on_command("commands", move |_, _| {
        Ok(Some(format!("available commands: {}", list)))
    })?;

    Ok(())
}

fn hello_command(_config: &Config, msg: &Message) -> HandlerResult {
    Ok(msg.nickname().map(|nick| format!("Hello {}!", nick)))
}

fn version_command(_config: &Config, _msg: &Message) -> HandlerResult {
    let version = env!("CARGO_PKG_VERSION");
    let msg = match (option_env!("BANGBOT_GIT_REV"), option_env!("BANGBOT_GIT_BRANCH")) {
        (Some(rev), Some(branch)) => {
            format!("bangbot v{} ({} on '{}' branch)", version, rev, branch)
        }
        _ => format!("bangbot v{}", version),
    };
    Ok(Some(msg))
}
