use api::{router::try_respond, RandomId, Service};
use db::{Database, Memory, QuestionRepo, QuizRepo};
use hyper::{server::conn::http1, service::service_fn};
use hyper_util::rt::TokioIo;
use std::{
    convert::Infallible,
    env,
    net::{Ipv4Addr, SocketAddr},
    sync::Arc,
};
use tokio::{net::TcpListener, runtime::Runtime};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Parse environment variables
    let port = env::var("PORT")?.parse()?;
    let maybe_pg = match env::var("PG_HOSTNAME") {
        Ok(host) => {
            let pg_port = match env::var("PG_PORT") {
                Ok(pg_port) => pg_port.parse()?,
                _ => 5432,
            };
            let mut config = db::Config::new();
            config
                .host(&host)
                .port(pg_port)
                .user(&env::var("PG_USERNAME")?)
                .password(env::var("PG_PASSWORD")?)
                .dbname(&env::var("PG_DATABASE")?);
            Some(config)
        }
        _ => None,
    };

    let runtime = Runtime::new()?;
    runtime.block_on(async {
        let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
        let tcp = TcpListener::bind(addr).await?;
        log::info!("listening on {addr}");

        let Some(config) = maybe_pg else {
            log::warn!("PG_HOSTNAME is not set; quizzes will only live in memory");
            return serve(tcp, Memory::default()).await;
        };

        let (client, conn) = config.connect(db::NoTls).await?;
        tokio::spawn(async move {
            if let Err(err) = conn.await {
                log::error!("database connection closed: {err}");
            }
        });
        serve(tcp, Database::from(client)).await
    })
}

async fn serve<R>(tcp: TcpListener, repo: R) -> anyhow::Result<()>
where
    R: QuizRepo + QuestionRepo + Send + Sync + 'static,
{
    let service = Arc::new(Service::new(repo, RandomId));
    loop {
        let (stream, peer) = tokio::select! {
            accepted = tcp.accept() => accepted?,
            signal = tokio::signal::ctrl_c() => {
                signal?;
                break;
            }
        };

        let outer = service.clone();
        tokio::spawn(async move {
            let svc = service_fn(move |req| {
                let inner = outer.clone();
                async move { Ok::<_, Infallible>(try_respond(req, &*inner).await) }
            });
            if let Err(err) = http1::Builder::new().serve_connection(TokioIo::new(stream), svc).await {
                log::error!("connection with {peer} failed: {err}");
            }
        });
    }

    log::info!("received Ctrl-C; shutting down");
    Ok(())
}
