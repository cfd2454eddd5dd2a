// ==========================================
// 机队维修适航跟踪系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::due::DueThresholds;
use crate::engine::deferral::DEFAULT_CATEGORY_A_DAYS;
use crate::engine::projection::DEFAULT_PROJECTION_WINDOWS;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 写入 global scope 配置值（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at) VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 获取所有配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        let json_value = json!(config_map);
        Ok(serde_json::to_string(&json_value)?)
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    ///
    /// # 注意
    /// - 此方法会覆盖现有的同名 global 配置
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> Result<usize, Box<dyn Error>> {
        let config_map: HashMap<String, String> = serde_json::from_str(snapshot_json)?;

        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let tx = conn.unchecked_transaction()?;

        let mut count = 0;
        for (key, value) in config_map.iter() {
            let affected = tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
                params![key, value],
            )?;
            count += affected;
        }

        tx.commit()?;
        Ok(count)
    }

    // ===== 到期状态阈值 =====

    /// 获取到期状态阈值（DUE_SOON / DUE 天数）
    ///
    /// 数值无法解析时按缺省值处理；组合是否合法由 DueEngine 校验
    pub fn get_due_thresholds(&self) -> Result<DueThresholds, Box<dyn Error>> {
        let defaults = DueThresholds::default();
        let due_soon = self.get_config_or_default(
            config_keys::DUE_SOON_DAYS,
            &defaults.due_soon_days.to_string(),
        )?;
        let due = self.get_config_or_default(config_keys::DUE_DAYS, &defaults.due_days.to_string())?;

        Ok(DueThresholds {
            due_soon_days: parse_or_warn(config_keys::DUE_SOON_DAYS, &due_soon, defaults.due_soon_days),
            due_days: parse_or_warn(config_keys::DUE_DAYS, &due, defaults.due_days),
        })
    }

    // ===== 预测窗口 =====

    /// 获取预测窗口列表（天，升序去重）
    pub fn get_projection_windows(&self) -> Result<Vec<i64>, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::PROJECTION_WINDOWS, "30,60,90")?;

        let mut windows: Vec<i64> = value
            .split(',')
            .filter_map(|s| s.trim().parse::<i64>().ok())
            .filter(|&w| w > 0)
            .collect();
        windows.sort_unstable();
        windows.dedup();

        if windows.is_empty() {
            tracing::warn!(
                config_key = config_keys::PROJECTION_WINDOWS,
                raw_value = %value,
                "预测窗口配置无有效值，使用缺省窗口"
            );
            Ok(DEFAULT_PROJECTION_WINDOWS.to_vec())
        } else {
            Ok(windows)
        }
    }

    // ===== 保留故障 =====

    /// A 类保留故障缺省期限（天）
    pub fn get_category_a_default_days(&self) -> Result<i64, Box<dyn Error>> {
        let value = self.get_config_or_default(
            config_keys::DEFAULT_DEFERRAL_DAYS_CAT_A,
            &DEFAULT_CATEGORY_A_DAYS.to_string(),
        )?;
        Ok(parse_or_warn(
            config_keys::DEFAULT_DEFERRAL_DAYS_CAT_A,
            &value,
            DEFAULT_CATEGORY_A_DAYS,
        ))
    }
}

fn parse_or_warn(key: &str, raw: &str, default: i64) -> i64 {
    raw.trim().parse::<i64>().unwrap_or_else(|_| {
        tracing::warn!(config_key = key, raw_value = %raw, "配置值格式错误，使用缺省值");
        default
    })
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 到期状态阈值
    pub const DUE_SOON_DAYS: &str = "due_soon_days";
    pub const DUE_DAYS: &str = "due_days";

    // 预测窗口（逗号分隔天数）
    pub const PROJECTION_WINDOWS: &str = "projection_windows";

    // 保留故障
    pub const DEFAULT_DEFERRAL_DAYS_CAT_A: &str = "default_deferral_days_cat_a";
}
