use rewrite_rules::{RequestFacts, RuleSet};

const RULES: &str = r"
# Send the bare domain to www, permanently.
RewriteCond %{HTTP_HOST} ^foo\.org$ [NC]
RewriteRule ^/(.*)$ http://www.foo.org/$1 [R=301,L]

# Legacy pages are served by the PHP front end.
RewriteRule ^/(.*)\.aspx$ /$1.php [NC,T=text/html]

# Nobody gets at the backups.
RewriteRule ^/backup/ - [F]
";

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let ruleset = RuleSet::parse(RULES).expect("failed to compile rules");
    println!("{ruleset}");

    let requests = [
        RequestFacts::new("/about").host("foo.org"),
        RequestFacts::new("/Default.ASPX?lang=en").host("www.foo.org"),
        RequestFacts::new("/backup/db.sql").host("www.foo.org"),
        RequestFacts::new("/static/site.css").host("www.foo.org"),
    ];

    for facts in &requests {
        match ruleset.interpret(facts) {
            Ok(outcome) => println!("{:<24} => {outcome}", facts.url()),
            Err(err) => println!("{:<24} => error: {err}", facts.url()),
        }
    }
}
