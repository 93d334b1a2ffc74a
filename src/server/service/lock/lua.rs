//! Lua scripts for the Valkey lock backend

// Lua script to take the lock if nobody holds it
// SET NX PX gives test-and-set with native expiry in a single step
//
// KEYS[1]: lock key
// ARGV[1]: holder token
// ARGV[2]: ttl in milliseconds
//
// Returns:
//   1 if the lock was taken
//   0 if another holder has it
pub static ACQUIRE_LOCK_SCRIPT: &str = r#"
local lock_key = KEYS[1]
local token = ARGV[1]
local ttl_ms = tonumber(ARGV[2])

if redis.call('SET', lock_key, token, 'NX', 'PX', ttl_ms) then
    return 1
end
return 0
"#;

// Lua script to release the lock only while we still own it
// A run that outlived its TTL must not delete the next holder's lock
//
// KEYS[1]: lock key
// ARGV[1]: holder token
//
// Returns:
//   1 if the lock was deleted
//   0 if it expired or belongs to someone else
pub static RELEASE_LOCK_SCRIPT: &str = r#"
local lock_key = KEYS[1]
local token = ARGV[1]

if redis.call('GET', lock_key) == token then
    return redis.call('DEL', lock_key)
end
return 0
"#;
