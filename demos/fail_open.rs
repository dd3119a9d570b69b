use rewrite_rules::{RequestFacts, RewriteSettings};

fn main() {
    tracing_subscriber::fmt().init();

    // The second rule refers to a variable nobody defines.
    let settings = RewriteSettings::new(
        "RewriteRule ^/old$ /new [R=301,L]\nRewriteRule ^/(.*)$ /%{SITE_ROOT}/$1",
    );

    for url in ["/old", "/other"] {
        let facts = RequestFacts::new(url);
        match settings.try_apply(&facts) {
            Ok(outcome) => println!("{url}: {outcome}"),
            Err(err) => println!("{url}: {err}"),
        }
        // The request is never blocked by a broken rule.
        println!("{url}: applied => {}", settings.apply(&facts));
    }
}
