pub type CmdResult<T> = pkgseed::Result<(T, i32)>;

pub mod init;
