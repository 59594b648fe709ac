// ============================================================================
// HexRail - 中文翻译表
// ============================================================================
//
// 文件: src/i18n/zh_cn.rs
// 职责: 中文翻译内容定义
// 边界:
//   - ✅ 中文翻译字符串定义
//   - ❌ 不应包含翻译逻辑
//   - ❌ 不应包含其他语言翻译
//
// ============================================================================

/// 中文翻译表
pub const TRANSLATIONS: &[(&str, &str)] = &[
    // 调度器相关
    ("scheduler.task_start", "开始对局: {}"),
    ("scheduler.fail_fast_triggered", "对局 {} 失败，取消剩余对局"),
    ("scheduler.task_success", "对局 {} 完成，用时 {}s"),
    ("scheduler.task_failed", "对局 {} 失败，用时 {}s: {}"),
    ("scheduler.task_timeout", "对局 {} 超时，用时 {}s"),
    ("scheduler.task_cancelled", "对局 {} 已取消"),
    ("scheduler.batch_start", "调度 {} 局对局"),
    ("scheduler.task_join_error", "对局线程异常: {}"),
    ("scheduler.batch_complete", "{}/{} 局对局完成"),
    ("scheduler.stopping_all_tasks", "正在停止所有对局..."),
    // 初始化命令相关
    ("init.start", "正在初始化 HexRail 配置..."),
    ("init.config_exists", "配置文件已存在: {}"),
    ("init.use_force_hint", "使用 --force 覆盖已有文件"),
    ("init.config_created", "配置文件已创建: {}"),
    ("init.next_steps", "现在可以编辑配置文件调整规则、地图与执行参数"),
    ("init.create_failed", "创建配置文件失败: {}"),
    // 地图命令相关
    ("map.generation_failed", "地图生成失败"),
    ("map.generated", "地图已生成，种子 {}"),
    ("map.summary_title", "地图概况"),
    ("map.tile_count", "{} 个地块，{} 座山"),
    ("map.city_count", "{} 座城市，{} 座起始城市"),
    ("map.legend", "{} 起始城市  {} 城市  {} 山地  {} 平原"),
    // 对局命令相关
    ("play.empty_name", "玩家名称不能为空: '{}'"),
    ("play.setup_failed", "对局设置失败"),
    ("play.game_failed", "对局已中止"),
    ("play.start", "开始 {} 人对局，种子 {}"),
    ("play.saved", "结果已保存到 {}"),
    ("play.score_out_of_range", "信用点 {} 超出排行榜分数范围"),
    ("play.invalid_input", "无效输入: '{}'"),
    ("play.prompt_header", "{} | {} | 信用点: {}"),
    ("play.prompt_enter", "按回车继续"),
    ("play.prompt_build", "选择要建造的铁轨（如 1 3），剩余预算: {}；空输入结束回合"),
    ("play.prompt_rent", "选择要租用的铁轨（如 1 3）；空输入确认"),
    ("play.prompt_drive", "骰子点数 {}: 选择要行驶到的地块"),
    ("play.prompt_confirm", "租用 {} 段铁轨，路径完整: {}。确认？[y/n]"),
    // 锦标赛相关
    ("tournament.running", "对局进行中"),
    ("tournament.start", "运行 {} 局对局，每局 {} 名玩家（种子 {}，并发 {}）"),
    ("tournament.invalid_players", "玩家数量 {} 无效：必须在 {} 到 {} 之间"),
    ("tournament.failed_games", "{} 局对局失败"),
    // 汇总相关
    ("summary.game_title", "对局汇总"),
    ("summary.seed", "种子: {}"),
    ("summary.rounds", "建造回合: {}，行驶回合: {}"),
    ("summary.cities", "已连接城市: {}/{}"),
    ("summary.standing", "{} 信用点，{} 段铁轨"),
    ("summary.human", "人类"),
    ("summary.winner", "获胜者: {}，{} 信用点"),
    ("summary.no_winner", "无获胜者"),
    ("summary.tournament_title", "锦标赛汇总"),
    ("summary.total_games", "总对局数: {}"),
    ("summary.finished_games", "完成: {}"),
    ("summary.failed_games", "失败: {}"),
    ("summary.timed_out_games", "超时: {}"),
    ("summary.cancelled_games", "取消: {}"),
    ("summary.average_rounds", "平均回合: 建造 {}，行驶 {}"),
    ("summary.seats", "座位统计"),
    ("summary.seat_line", "  座位 {}: 获胜 {} 次（{}%），平均信用点 {}"),
    ("summary.duration", "总用时: {}s"),
    // 排行榜相关
    ("leaderboard.title", "排行榜"),
    ("leaderboard.empty", "{} 中没有排行榜记录"),
    ("leaderboard.rank", "#"),
    ("leaderboard.player", "玩家"),
    ("leaderboard.ai", "AI"),
    ("leaderboard.time", "时间"),
    ("leaderboard.score", "得分"),
];
