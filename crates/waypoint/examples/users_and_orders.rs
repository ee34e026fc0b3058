//! Serves two route groups and echoes what matched.
//!
//! ```text
//! cargo run -p waypoint --example users_and_orders
//! curl localhost:8080/users/42/address/home
//! ```

use waypoint::prelude::*;

fn describe() -> BoxedHandler {
    named("describe", |ctx| {
        Box::pin(async move {
            let mut body = String::from("hello waypoint\n");
            body.push_str(&format!("your path: {}\n", ctx.request().uri()));
            body.push_str(&format!("match path: {}\n", ctx.path()));
            for (name, value) in ctx.params().iter() {
                body.push_str(&format!("param {name}: {value}\n"));
            }
            if let Some(rest) = ctx.wildcard() {
                body.push_str(&format!("wildcard: {rest}\n"));
            }
            ctx.text(StatusCode::OK, body);
            Ok(())
        })
    })
}

fn timing() -> BoxedHandler {
    named("timing", |ctx| {
        Box::pin(async move {
            let result = ctx.next().await;
            tracing::info!(elapsed = ?ctx.elapsed(), route = ctx.path(), "handled");
            result
        })
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ConfigLoader::new()
        .with_development()
        .with_env_prefix("WAYPOINT")
        .load()?;
    waypoint::init_logging(&config)?;

    let app = App::from_config(&config);

    let mut users = app.group("/users");
    users.use_middleware(timing());
    users.get("/new", [describe()])?;
    users.get("/:id", [describe()])?;
    users.get("/:id/address/:address", [describe()])?;
    users.get("/:id/report/download", [describe()])?;
    users.get("/*", [describe()])?;
    users.get("/info/*", [describe()])?;

    let orders = app.group("/orders");
    orders.get("/new", [describe()])?;
    orders.get("/:id", [describe()])?;
    orders.get("/:id/items/:item-number", [describe()])?;
    orders.get("/:id/report/download", [describe()])?;
    orders.get("/*", [describe()])?;
    orders.get("/shipping/*", [describe()])?;

    waypoint::run(app, &config).await?;
    Ok(())
}
