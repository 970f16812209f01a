/// Ends the current loop iteration once any of the given signals changes.
/// Breaks out of the loop when a signal closes or the process receives Ctrl-C.
#[macro_export]
macro_rules! continue_on {
    ($($fut:expr),+ $(,)?) => {{
        tokio::select! {
            $(
                res = $fut => {
                    match res {
                        Ok(_) => continue,
                        Err(_) => break,
                    }
                },
            )+
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        };
    }};
}

/// Like `continue_on!`, but also continues after `$duration` elapses without a change.
#[macro_export]
macro_rules! continue_after {
    ($duration:expr, $($fut:expr),+ $(,)?) => {{
        tokio::select! {
            $(
                res = $fut => {
                    match res {
                        Ok(_) => continue,
                        Err(_) => break,
                    }
                },
            )+
            () = tokio::time::sleep($duration) => {
                continue;
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        };
    }};
}
