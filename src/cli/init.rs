// ============================================================================
// HexRail - 初始化命令处理
// ============================================================================
//
// 文件: src/cli/init.rs
// 职责: 处理配置文件初始化命令
// 边界:
//   - ✅ 初始化命令参数解析
//   - ✅ 默认配置文件生成
//   - ✅ 配置文件存在性检查
//   - ❌ 不应包含配置文件格式定义
//   - ❌ 不应包含配置验证逻辑
//
// ============================================================================

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::models::config::{Config, CONFIG_FILE_NAME};
use crate::utils::logger::Logger;
use crate::{t, tf};

/// 初始化命令参数
#[derive(Debug, Args)]
pub struct InitArgs {
    /// 配置文件路径
    #[arg(short, long, default_value = CONFIG_FILE_NAME)]
    pub config: PathBuf,

    /// 强制覆盖已存在的配置文件
    #[arg(short, long)]
    pub force: bool,
}

/// 处理初始化命令
pub fn handle_init(args: InitArgs) -> Result<()> {
    Logger::info(t!("init.start"));

    // 检查配置文件是否已存在
    if args.config.exists() && !args.force {
        Logger::warn(tf!("init.config_exists", args.config.display()));
        Logger::info(t!("init.use_force_hint"));
        return Ok(());
    }

    match Config::create_default_config_file(&args.config) {
        Ok(_) => {
            Logger::success(tf!("init.config_created", args.config.display()));
            Logger::info(t!("init.next_steps"));
        }
        Err(e) => {
            Logger::error(tf!("init.create_failed", e));
            return Err(e);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn init_writes_loadable_config_and_respects_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        handle_init(InitArgs {
            config: path.clone(),
            force: false,
        })
        .unwrap();
        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.rules.starting_credits, 20);

        std::fs::write(&path, "[rules]\nstarting_credits = 7\n").unwrap();
        handle_init(InitArgs {
            config: path.clone(),
            force: false,
        })
        .unwrap();
        assert_eq!(Config::load_from_file(&path).unwrap().rules.starting_credits, 7);

        handle_init(InitArgs {
            config: path.clone(),
            force: true,
        })
        .unwrap();
        assert_eq!(Config::load_from_file(&path).unwrap().rules.starting_credits, 20);
    }
}
