use async_trait::async_trait;
use chrono::Utc;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client, Script};
use todo_shared::{CreateTodoRequest, Todo, UpdateTodoRequest};
use uuid::Uuid;

use super::{StoreError, StoreResult, TodoStore};

/// Sorted set scored by creation time in microseconds. Members are
/// `{sequence}:{id}` with a zero-padded sequence, so records created in the
/// same microsecond still list newest first.
const CREATED_INDEX: &str = "todos:by_created";
/// Counter handing out index sequence numbers.
const INDEX_SEQUENCE: &str = "todos:seq";
/// Hash from todo id to its index member.
const INDEX_MEMBERS: &str = "todos:members";

/// KEYS: document, index, sequence, members. ARGV: json, score, id.
const CREATE_SCRIPT: &str = r#"
    local seq = redis.call('INCR', KEYS[3])
    local member = string.format('%020d:%s', seq, ARGV[3])
    redis.call('SET', KEYS[1], ARGV[1])
    redis.call('ZADD', KEYS[2], ARGV[2], member)
    redis.call('HSET', KEYS[4], ARGV[3], member)
    return seq
"#;

/// KEYS: document, index, members. ARGV: id. Returns the number of documents removed.
const DELETE_SCRIPT: &str = r#"
    local deleted = redis.call('DEL', KEYS[1])
    local member = redis.call('HGET', KEYS[3], ARGV[1])
    if member then
        redis.call('ZREM', KEYS[2], member)
        redis.call('HDEL', KEYS[3], ARGV[1])
    end
    return deleted
"#;

fn todo_key(id: impl std::fmt::Display) -> String {
    format!("todo:{id}")
}

/// Redis-backed store. Each record is a JSON document at `todo:{id}`.
#[derive(Clone)]
pub struct RedisStore {
    conn: MultiplexedConnection,
}

impl RedisStore {
    /// Opens a multiplexed connection and checks it with `PING`.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let client = Client::open(url)?;
        let conn = client.get_multiplexed_tokio_connection().await?;
        let store = Self { conn };
        store.ping().await?;
        Ok(store)
    }

    fn conn(&self) -> MultiplexedConnection {
        self.conn.clone()
    }

    async fn load(&self, conn: &mut MultiplexedConnection, key: &str) -> StoreResult<Todo> {
        let json: Option<String> = conn.get(key).await?;
        let json = json.ok_or(StoreError::NotFound)?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[async_trait]
impl TodoStore for RedisStore {
    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.conn();
        redis::cmd("PING").query_async::<_, String>(&mut conn).await?;
        Ok(())
    }

    async fn create(&self, request: CreateTodoRequest) -> StoreResult<Todo> {
        let todo = Todo::new(request, Utc::now())?;
        let json = serde_json::to_string(&todo)?;

        let mut conn = self.conn();
        let script = Script::new(CREATE_SCRIPT);
        script
            .key(todo_key(todo.id))
            .key(CREATED_INDEX)
            .key(INDEX_SEQUENCE)
            .key(INDEX_MEMBERS)
            .arg(json)
            .arg(todo.created_at.timestamp_micros())
            .arg(todo.id.to_string())
            .invoke_async::<_, ()>(&mut conn)
            .await?;

        Ok(todo)
    }

    async fn list(&self) -> StoreResult<Vec<Todo>> {
        let mut conn = self.conn();
        let members: Vec<String> = conn.zrevrange(CREATED_INDEX, 0, -1).await?;
        let keys: Vec<String> = members
            .iter()
            .filter_map(|member| member.split_once(':'))
            .map(|(_, id)| todo_key(id))
            .collect();
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let documents: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut conn)
            .await?;

        // An id can outlive its document only if someone edited Redis by hand.
        documents
            .into_iter()
            .flatten()
            .map(|json| serde_json::from_str(&json).map_err(StoreError::from))
            .collect()
    }

    async fn get(&self, id: Uuid) -> StoreResult<Todo> {
        let mut conn = self.conn();
        self.load(&mut conn, &todo_key(id)).await
    }

    async fn update(&self, id: Uuid, patch: UpdateTodoRequest) -> StoreResult<Todo> {
        let key = todo_key(id);
        let mut conn = self.conn();

        let current = self.load(&mut conn, &key).await?;
        let updated = current.apply(&patch, Utc::now())?;

        // XX: never recreate a document deleted since it was read.
        let written: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(serde_json::to_string(&updated)?)
            .arg("XX")
            .query_async(&mut conn)
            .await?;

        match written {
            Some(_) => Ok(updated),
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut conn = self.conn();
        let script = Script::new(DELETE_SCRIPT);
        let deleted: usize = script
            .key(todo_key(id))
            .key(CREATED_INDEX)
            .key(INDEX_MEMBERS)
            .arg(id.to_string())
            .invoke_async(&mut conn)
            .await?;

        if deleted == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
