//! cd command - Change the working directory
//!
//! Each invocation is one-shot, so a successful `cd` prints the normalized
//! path for the caller to carry into the next `--pwd`. A target with nothing
//! stored beneath it is reported instead and the command still succeeds.

use std::io::Write;

use clap::Args;
use sn_core::{Result, Session};

/// Change the working directory
#[derive(Args, Debug)]
pub struct CdArgs {
    /// Target path, absolute or relative to the working directory
    #[arg(default_value = "/")]
    pub path: String,
}

/// Execute the cd command
pub async fn execute<W: Write>(args: &CdArgs, session: &mut Session<W>) -> Result<()> {
    if session.chdir(&args.path).await? {
        let pwd = session.pwd().to_string();
        writeln!(session.output_mut(), "{pwd}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sn_core::SessionConfig;
    use sn_core::memory::{MemoryConnector, MemoryStore};

    use super::*;

    async fn session(pwd: &str) -> Session<Vec<u8>> {
        let config = SessionConfig {
            working_dir: pwd.into(),
            access_key: "AccEssKey".into(),
            secret_key: "SecRetKey".into(),
            bucket: "bukkit".into(),
        };
        let store = Arc::new(MemoryStore::new().with_object("bukkit", "a/c/d.txt", 7));
        let mut session = Session::new(config, Vec::new()).unwrap();
        session
            .setup_bucket(&MemoryConnector::new(store))
            .await
            .unwrap();
        session
    }

    fn cd(path: &str) -> CdArgs {
        CdArgs { path: path.into() }
    }

    #[tokio::test]
    async fn test_cd_prints_new_pwd() {
        let mut session = session("/a").await;
        execute(&cd("c/"), &mut session).await.unwrap();
        assert_eq!(session.into_output(), b"/a/c\n");
    }

    #[tokio::test]
    async fn test_cd_to_root() {
        let mut session = session("/a/c").await;
        execute(&cd("/"), &mut session).await.unwrap();
        assert_eq!(session.into_output(), b"/\n");
    }

    #[tokio::test]
    async fn test_cd_dot_in_missing_dir_is_reported() {
        let mut session = session("/z").await;
        execute(&cd("."), &mut session).await.unwrap();
        assert_eq!(session.into_output(), b"cd: /z: No such directory\n");
    }

    #[tokio::test]
    async fn test_cd_missing_prints_only_the_report() {
        let mut session = session("/a").await;
        execute(&cd("/z"), &mut session).await.unwrap();
        assert_eq!(session.pwd().to_string(), "/a");
        assert_eq!(session.into_output(), b"cd: /z: No such directory\n");
    }
}
