use std::process;

fn main() {
    if let Some((rev, branch)) = git_version() {
        println!("cargo:rustc-env=BANGBOT_GIT_REV={}", rev);
        println!("cargo:rustc-env=BANGBOT_GIT_BRANCH={}", branch);
    }
}

fn git_version() -> Option<(String, String)> {
    fn git(args: &[&str]) -> Option<String> {
        let out = process::Command::new("git").args(args).output().ok()?;
        let res = String::from_utf8_lossy(&out.stdout).trim().to_string();
        if res.is_empty() {
            None
        } else {
            Some(res)
        }
    }

    let rev = git(&["rev-parse", "--short=12", "HEAD"])?;
    let branch = git(&["rev-parse", "--abbrev-ref", "HEAD"])?;
    Some((rev, branch))
}
