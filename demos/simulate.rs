use rewrite_rules::simulate;

const RULES: &str = "\
RewriteCond %{QUERY_STRING} foo=(.+)
RewriteRule ^/grab/(.*) /%1/index.php?file=$1 [QSA]
RewriteRule ^/(.*)/index\\.php$ /app/$1 [N]
RewriteRule ^/app/(.*)$ - [L]
";

fn main() {
    let urls = [
        "http://domain.com/grab/foobar.zip?level=5&foo=bar",
        "http://domain.com/grab/foobar.zip",
        "not a url",
    ];

    for url in urls {
        println!("{url}");
        match simulate(url, "", RULES) {
            Ok(report) => println!("  {report}"),
            Err(err) => println!("  error: {err}"),
        }
    }
}
