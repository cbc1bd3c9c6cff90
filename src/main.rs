// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use ktu_record::config::settings::Settings;
use ktu_record::engines::reqwest_session::ReqwestSessionFactory;
use ktu_record::engines::traits::SessionFactory;
use ktu_record::presentation::routes;
use ktu_record::utils::telemetry;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration
    let settings = Arc::new(Settings::new()?);

    // 2. Initialize logging
    telemetry::init_telemetry(&settings.log);
    info!(portal = %settings.portal.base_url, "Starting ktu-record...");

    // 3. Portal sessions, one per request
    let sessions: Arc<dyn SessionFactory> =
        Arc::new(ReqwestSessionFactory::new(settings.portal.clone()));

    let app = routes::build_app(settings.clone(), sessions);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
