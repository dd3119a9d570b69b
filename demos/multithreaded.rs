use std::sync::Arc;
use std::thread;

use rewrite_rules::{RequestFacts, RuleSet};

fn main() {
    let ruleset = Arc::new(
        RuleSet::parse(
            "RewriteRule ^/user/([0-9]+)$ /profile.php?id=$1 [L]\n\
             RewriteRule ^/(.*)$ /index.php?path=$1 [QSA]",
        )
        .expect("failed to compile rules"),
    );

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let rs = Arc::clone(&ruleset);
            thread::spawn(move || {
                // Each pass builds and drops its own environment.
                let url = if i % 2 == 0 {
                    format!("/user/{i}")
                } else {
                    format!("/page/{i}?ref=demo")
                };
                let outcome = rs.interpret(&RequestFacts::new(url.clone()));
                (url, outcome)
            })
        })
        .collect();

    for handle in handles {
        let (url, outcome) = handle.join().expect("thread panicked");
        match outcome {
            Ok(outcome) => println!("{url:<20} => {outcome}"),
            Err(err) => println!("{url:<20} => error: {err}"),
        }
    }
}
